/***
error code is the http status returned to the client

validation   400
session      401
permission   403
not found    404
internal     500

error message is correspond with error code
*/

use thiserror::Error;
use tracing::error;

pub type BackendRes<D, E = BackendError> = Result<Option<D>, E>;

pub trait ErrorCode {
    fn code(&self) -> u16;
}

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("{0}")]
    RequestParamInvalid(String),
    #[error("{0}")]
    Authorization(String),
    #[error("{0}")]
    PermissionDenied(String),
    #[error("Internal server error")]
    InternalError(String),
    #[error("{0}")]
    AccountManager(#[from] AccountManagerError),
    #[error("{0}")]
    Rewards(#[from] RewardsError),
    #[error("{0}")]
    ExternalService(#[from] ExternalServiceError),
}

impl ErrorCode for BackendError {
    fn code(&self) -> u16 {
        match self {
            BackendError::RequestParamInvalid(_) => 400,
            BackendError::Authorization(_) => 401,
            BackendError::PermissionDenied(_) => 403,
            BackendError::InternalError(_) => 500,
            BackendError::AccountManager(err) => err.code(),
            BackendError::Rewards(err) => err.code(),
            BackendError::ExternalService(err) => err.code(),
        }
    }
}

//anything from the db layer that the handler didn't translate
impl From<anyhow::Error> for BackendError {
    fn from(error: anyhow::Error) -> Self {
        error!("unexpected error: {:?}", error);
        BackendError::InternalError(error.to_string())
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum AccountManagerError {
    #[error("All fields are required")]
    RequiredFieldsMissing,
    #[error("Name must be at least 3 characters")]
    NameTooShort,
    #[error("Please enter a valid email address")]
    EmailIncorrect,
    #[error("Password must be at least 8 characters")]
    PasswordTooShort,
    #[error("Email already registered!")]
    EmailAlreadyRegister,
    #[error("Invalid referral code format")]
    ReferralCodeMalformed,
    #[error("Invalid referral code")]
    ReferralCodeNotExist,
    #[error("User not found")]
    UserNotFound,
    #[error("User not found with this email.")]
    EmailNotRegister,
    #[error("User is already verified")]
    AlreadyVerified,
    #[error("Invalid or expired OTP")]
    OtpIncorrectOrExpired,
    #[error("OTP not verified. Please verify your OTP first.")]
    OtpNotVerified,
    #[error("Invalid Email or Password")]
    PasswordIncorrect,
    #[error("Your account was not verified and has been deleted. Please sign up again.")]
    UnverifiedAccountDeleted,
    #[error("Old password is incorrect")]
    OldPasswordIncorrect,
    #[error("Passwords do not match")]
    PasswordNotMatch,
    #[error("Invalid user ID format")]
    UserIdMalformed,
    #[error("No free card number left for {0} digits")]
    CardNumberExhausted(usize),
}

impl ErrorCode for AccountManagerError {
    fn code(&self) -> u16 {
        match self {
            Self::RequiredFieldsMissing
            | Self::NameTooShort
            | Self::EmailIncorrect
            | Self::PasswordTooShort
            | Self::EmailAlreadyRegister
            | Self::ReferralCodeMalformed
            | Self::ReferralCodeNotExist
            | Self::AlreadyVerified
            | Self::OtpIncorrectOrExpired
            | Self::OtpNotVerified
            | Self::PasswordNotMatch
            | Self::UserIdMalformed => 400,
            Self::PasswordIncorrect | Self::OldPasswordIncorrect => 401,
            Self::UnverifiedAccountDeleted => 403,
            Self::UserNotFound | Self::EmailNotRegister => 404,
            Self::CardNumberExhausted(_) => 500,
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum RewardsError {
    #[error("Daily claim limit reached. Try again tomorrow.")]
    DailyClaimLimitReached,
    #[error("Amount is compulsory and must be at least 1000")]
    InvestmentTooLow,
    #[error("No referred points found for the user")]
    NoReferredPoints,
    #[error("Referred user not found")]
    ReferrerNotFound,
    #[error("No referred users found")]
    ReferredUsersNotFound,
    #[error("Withdraw request not found")]
    WithdrawNotFound,
    #[error("Withdraw request already processed")]
    WithdrawAlreadyProcessed,
    #[error("Insufficient converted balance")]
    InsufficientBalance,
}

impl ErrorCode for RewardsError {
    fn code(&self) -> u16 {
        match self {
            Self::DailyClaimLimitReached
            | Self::InvestmentTooLow
            | Self::NoReferredPoints
            | Self::WithdrawAlreadyProcessed
            | Self::InsufficientBalance => 400,
            Self::ReferrerNotFound | Self::ReferredUsersNotFound | Self::WithdrawNotFound => 404,
        }
    }
}

#[derive(Error, Debug)]
pub enum ExternalServiceError {
    #[error("Failed to send mail: {0}")]
    Email(String),
    #[error("Failed to send verification email. Please try again.")]
    VerificationEmail,
    #[error("Failed to store file: {0}")]
    FileStorage(String),
}

impl ErrorCode for ExternalServiceError {
    fn code(&self) -> u16 {
        500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        let err: BackendError = AccountManagerError::OtpIncorrectOrExpired.into();
        assert_eq!(err.code(), 400);
        assert_eq!(err.to_string(), "Invalid or expired OTP");

        let err: BackendError = AccountManagerError::UnverifiedAccountDeleted.into();
        assert_eq!(err.code(), 403);

        let err: BackendError = AccountManagerError::UserNotFound.into();
        assert_eq!(err.code(), 404);

        let err: BackendError = RewardsError::DailyClaimLimitReached.into();
        assert_eq!(err.code(), 400);
        assert_eq!(
            err.to_string(),
            "Daily claim limit reached. Try again tomorrow."
        );

        let err: BackendError = ExternalServiceError::Email("timeout".to_string()).into();
        assert_eq!(err.code(), 500);
    }

    #[test]
    fn test_error_code_internal_hides_detail() {
        let err: BackendError = anyhow::anyhow!("connection refused").into();
        assert_eq!(err.code(), 500);
        assert_eq!(err.to_string(), "Internal server error");
    }
}
