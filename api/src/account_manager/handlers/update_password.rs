use actix_web::HttpRequest;
use common::error_code::{AccountManagerError, BackendRes};
use models::account_manager::{UserFilter, UserInfoEntity, UserUpdater};
use models::general::get_pg_pool_connect;
use models::{PgLocalCli, PsqlOp};

use crate::account_manager::UpdatePasswordRequest;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::{get_session_user, token_auth, validate_password};

pub async fn req(req: HttpRequest, request_data: UpdatePasswordRequest) -> BackendRes<String> {
    let user_id = token_auth::validate_credentials(&req)?;
    let UpdatePasswordRequest {
        old_password,
        password,
        confirm_password,
    } = request_data;
    let (old_password, password, confirm_password) =
        match (old_password, password, confirm_password) {
            (Some(old), Some(new), Some(confirm))
                if !old.is_empty() && !new.is_empty() && !confirm.is_empty() =>
            {
                (old, new, confirm)
            }
            _ => Err(AccountManagerError::RequiredFieldsMissing)?,
        };

    let mut db_cli: PgLocalCli = get_pg_pool_connect().await?;
    let user = get_session_user(&user_id, &mut db_cli).await?;
    if !verify_password(&old_password, &user.password_hash) {
        Err(AccountManagerError::OldPasswordIncorrect)?;
    }
    if password != confirm_password {
        Err(AccountManagerError::PasswordNotMatch)?;
    }
    validate_password(&password)?;

    let password_hash = hash_password(&password)?;
    UserInfoEntity::update_single(
        UserUpdater::PasswordHash(&password_hash),
        UserFilter::ById(&user.id),
        &mut db_cli,
    )
    .await?;
    Ok(None)
}
