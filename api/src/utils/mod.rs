use common::constants::{NAME_MIN_LEN, PASSWORD_MIN_LEN};
use common::data_structures::account_manager::{PointsLedger, UserInfo};
use common::error_code::{AccountManagerError, BackendError};
use models::account_manager::{UserFilter, UserInfoEntity, UserUpdater};
use models::{is_not_found, PgLocalCli, PsqlOp};
use regex::Regex;
use uuid::Uuid;

pub mod card_number;
pub mod level;
pub mod mail;
pub mod otp;
pub mod password;
pub mod points;
pub mod referral;
pub mod respond;
pub mod storage;
pub mod token_auth;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$").expect("static regex");
}

pub fn validate_email(email: &str) -> Result<(), AccountManagerError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(AccountManagerError::EmailIncorrect)
    }
}

pub fn validate_name(name: &str) -> Result<(), AccountManagerError> {
    if name.trim().chars().count() < NAME_MIN_LEN {
        Err(AccountManagerError::NameTooShort)
    } else {
        Ok(())
    }
}

pub fn validate_password(password: &str) -> Result<(), AccountManagerError> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        Err(AccountManagerError::PasswordTooShort)
    } else {
        Ok(())
    }
}

//path ids must be uuids before they reach the db
pub fn validate_user_id(user_id: &str) -> Result<(), AccountManagerError> {
    Uuid::parse_str(user_id)
        .map(|_| ())
        .map_err(|_| AccountManagerError::UserIdMalformed)
}

/// Load one account, turning a missing row into `not_found`.
pub async fn find_user<E: Into<BackendError>>(
    filter: UserFilter<'_>,
    not_found: E,
    cli: &mut PgLocalCli<'_>,
) -> Result<UserInfo, BackendError> {
    match UserInfoEntity::find_single(filter, cli).await {
        Ok(entity) => Ok(entity.into_inner()),
        Err(err) if is_not_found(&err) => Err(not_found.into()),
        Err(err) => Err(err.into()),
    }
}

/// Account of an authenticated session.
pub async fn get_session_user(
    user_id: &str,
    cli: &mut PgLocalCli<'_>,
) -> Result<UserInfo, BackendError> {
    find_user(UserFilter::ById(user_id), AccountManagerError::UserNotFound, cli).await
}

/// Same as `get_session_user` but the row stays locked until the transaction ends.
pub async fn lock_session_user(
    user_id: &str,
    cli: &mut PgLocalCli<'_>,
) -> Result<UserInfo, BackendError> {
    find_user(
        UserFilter::ByIdForUpdate(user_id),
        AccountManagerError::UserNotFound,
        cli,
    )
    .await
}

pub async fn save_ledger(
    user_id: &str,
    ledger: &PointsLedger,
    cli: &mut PgLocalCli<'_>,
) -> Result<(), BackendError> {
    UserInfoEntity::update_single(UserUpdater::Ledger(ledger), UserFilter::ById(user_id), cli)
        .await?;
    Ok(())
}

pub async fn require_admin(
    user_id: &str,
    cli: &mut PgLocalCli<'_>,
) -> Result<UserInfo, BackendError> {
    let user = get_session_user(user_id, cli).await?;
    if !user.is_admin() {
        Err(BackendError::PermissionDenied(
            "Only admin can access this resource".to_string(),
        ))?;
    }
    Ok(user)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use common::data_structures::account_manager::{
        AccountStatus, CardDetails, Eligibility, UserRole,
    };

    pub(crate) fn sample_user(email: &str) -> UserInfo {
        let id = Uuid::new_v4().to_string();
        UserInfo {
            referral_link: format!("ann/referral/{}", id),
            id,
            name: "Ann".to_string(),
            email: email.to_string(),
            phone: 123,
            password_hash: String::new(),
            status: AccountStatus::Pending,
            otp: None,
            otp_expires: None,
            eligible: Eligibility::Unverified,
            user_role: UserRole::User,
            payment_image: None,
            card_details: CardDetails::default(),
            referred_by: None,
            ledger: PointsLedger::default(),
        }
    }

    #[test]
    fn test_validate_fields() {
        assert!(validate_email("a@x.com").is_ok());
        assert_eq!(
            validate_email("ax.com"),
            Err(AccountManagerError::EmailIncorrect)
        );
        assert!(validate_name("Ann").is_ok());
        assert_eq!(validate_name(" A "), Err(AccountManagerError::NameTooShort));
        assert!(validate_password("password1").is_ok());
        assert_eq!(
            validate_password("short"),
            Err(AccountManagerError::PasswordTooShort)
        );
    }

    #[test]
    fn test_validate_user_id() {
        assert!(validate_user_id(&Uuid::new_v4().to_string()).is_ok());
        assert_eq!(
            validate_user_id("64b7f0c2e4b0a1a2b3c4d5e6"),
            Err(AccountManagerError::UserIdMalformed)
        );
    }
}
