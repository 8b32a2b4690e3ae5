use common::data_structures::account_manager::AccountStatus;
use common::error_code::{AccountManagerError, BackendError};
use models::account_manager::{UserFilter, UserInfoEntity};
use models::general::get_pg_pool_connect;
use models::{PgLocalCli, PsqlOp};
use tracing::warn;

use super::UserReply;
use crate::account_manager::LoginRequest;
use crate::utils::password::verify_password;
use crate::utils::{find_user, token_auth};

pub async fn req(request_data: LoginRequest) -> Result<(String, UserReply), BackendError> {
    let (email, password) = match (request_data.email, request_data.password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            (email, password)
        }
        _ => Err(AccountManagerError::RequiredFieldsMissing)?,
    };

    let mut db_cli: PgLocalCli = get_pg_pool_connect().await?;
    let user = find_user(
        UserFilter::ByEmail(&email),
        AccountManagerError::UserNotFound,
        &mut db_cli,
    )
    .await?;

    if !verify_password(&password, &user.password_hash) {
        Err(AccountManagerError::PasswordIncorrect)?;
    }

    //never verified, the user has to sign up again
    if user.status == AccountStatus::Pending {
        UserInfoEntity::delete(UserFilter::ById(&user.id), &mut db_cli).await?;
        warn!("pending account {} removed at login", user.id);
        Err(AccountManagerError::UnverifiedAccountDeleted)?;
    }

    let token = token_auth::create_jwt(&user.id)?;
    Ok((token, UserReply { user }))
}
