use common::error_code::{AccountManagerError, BackendRes};
use common::utils::time::now_millis;
use models::account_manager::{UserFilter, UserInfoEntity, UserUpdater};
use models::general::get_pg_pool_connect;
use models::{PgLocalCli, PsqlOp};

use crate::account_manager::{ForgotPasswordOtpRequest, ResetPasswordRequest, VerifyOtpRequest};
use crate::utils::mail::{reset_password_template, send_email};
use crate::utils::otp::{has_stored_otp, otp_matches, Otp};
use crate::utils::password::hash_password;
use crate::utils::{find_user, validate_password};

pub async fn otp_req(request_data: ForgotPasswordOtpRequest) -> BackendRes<String> {
    let email = request_data
        .email
        .filter(|email| !email.is_empty())
        .ok_or(AccountManagerError::RequiredFieldsMissing)?;

    let mut db_cli: PgLocalCli = get_pg_pool_connect().await?;
    let user = find_user(
        UserFilter::ByEmail(&email),
        AccountManagerError::EmailNotRegister,
        &mut db_cli,
    )
    .await?;

    //a new code replaces whatever was pending
    let otp = Otp::issue(now_millis());
    UserInfoEntity::update_single(
        UserUpdater::Otp(&otp.code, otp.expires_at),
        UserFilter::ById(&user.id),
        &mut db_cli,
    )
    .await?;
    send_email(
        &user.email,
        "OTP for Password Reset",
        reset_password_template(&user.name, &otp.code),
    )
    .await?;
    Ok(None)
}

pub async fn verify_req(request_data: VerifyOtpRequest) -> BackendRes<String> {
    let (email, otp) = match (request_data.email, request_data.otp) {
        (Some(email), Some(otp)) if !email.is_empty() && !otp.is_empty() => (email, otp),
        _ => Err(AccountManagerError::RequiredFieldsMissing)?,
    };

    let mut db_cli: PgLocalCli = get_pg_pool_connect().await?;
    let user = find_user(
        UserFilter::ByEmail(&email),
        AccountManagerError::EmailNotRegister,
        &mut db_cli,
    )
    .await?;
    if !otp_matches(&user, &otp) {
        Err(AccountManagerError::OtpIncorrectOrExpired)?;
    }
    Ok(None)
}

pub async fn reset_req(request_data: ResetPasswordRequest) -> BackendRes<String> {
    let (email, password) = match (request_data.email, request_data.password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            (email, password)
        }
        _ => Err(AccountManagerError::RequiredFieldsMissing)?,
    };
    validate_password(&password)?;

    let mut db_cli: PgLocalCli = get_pg_pool_connect().await?;
    let user = find_user(
        UserFilter::ByEmail(&email),
        AccountManagerError::EmailNotRegister,
        &mut db_cli,
    )
    .await?;
    if !has_stored_otp(&user) {
        Err(AccountManagerError::OtpNotVerified)?;
    }

    let password_hash = hash_password(&password)?;
    UserInfoEntity::update_single(
        UserUpdater::ResetPassword(&password_hash),
        UserFilter::ById(&user.id),
        &mut db_cli,
    )
    .await?;
    Ok(None)
}
