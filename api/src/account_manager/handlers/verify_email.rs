use common::data_structures::account_manager::AccountStatus;
use common::error_code::{AccountManagerError, BackendError};
use common::utils::time::now_millis;
use models::account_manager::{UserFilter, UserInfoEntity, UserUpdater};
use models::general::get_pg_pool_connect;
use models::{PgLocalCli, PsqlOp};

use super::UserReply;
use crate::account_manager::VerifyOtpRequest;
use crate::utils::find_user;
use crate::utils::otp::verify_otp;
use crate::utils::token_auth;

pub async fn req(request_data: VerifyOtpRequest) -> Result<(String, UserReply), BackendError> {
    let (email, otp) = match (request_data.email, request_data.otp) {
        (Some(email), Some(otp)) if !email.is_empty() && !otp.is_empty() => (email, otp),
        _ => Err(AccountManagerError::RequiredFieldsMissing)?,
    };

    let mut db_cli: PgLocalCli = get_pg_pool_connect().await?;
    let mut user = find_user(
        UserFilter::ByEmail(&email),
        AccountManagerError::UserNotFound,
        &mut db_cli,
    )
    .await?;
    if user.status == AccountStatus::Verified {
        Err(AccountManagerError::AlreadyVerified)?;
    }
    if !verify_otp(&user, &otp, now_millis()) {
        Err(AccountManagerError::OtpIncorrectOrExpired)?;
    }

    UserInfoEntity::update_single(
        UserUpdater::MarkVerified,
        UserFilter::ById(&user.id),
        &mut db_cli,
    )
    .await?;
    user.status = AccountStatus::Verified;
    user.otp = None;
    user.otp_expires = None;

    let token = token_auth::create_jwt(&user.id)?;
    Ok((token, UserReply { user }))
}
