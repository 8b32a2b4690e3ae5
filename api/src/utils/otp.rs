use common::constants::OTP_EXPIRE_TIME;
use common::data_structures::account_manager::UserInfo;
use common::utils::math::gen_random_verify_code;

#[derive(Debug, Clone, PartialEq)]
pub struct Otp {
    pub code: String,
    pub expires_at: u64,
}

impl Otp {
    /// Fresh 4 digit code valid for five minutes from `now`.
    pub fn issue(now: u64) -> Self {
        Otp {
            code: gen_random_verify_code().to_string(),
            expires_at: now + OTP_EXPIRE_TIME,
        }
    }
}

//caller clears the stored code once it is consumed
pub fn verify_otp(user: &UserInfo, candidate: &str, now: u64) -> bool {
    match (&user.otp, user.otp_expires) {
        (Some(code), Some(expires_at)) => code == candidate && now <= expires_at,
        _ => false,
    }
}

/// Forgot-password check, the stored code is compared but its window is not.
pub fn otp_matches(user: &UserInfo, candidate: &str) -> bool {
    user.otp.as_deref() == Some(candidate)
}

/// A code was issued and not consumed yet.
pub fn has_stored_otp(user: &UserInfo) -> bool {
    user.otp.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::tests::sample_user;

    #[test]
    fn test_otp_issue() {
        let otp = Otp::issue(1_000);
        assert_eq!(otp.code.len(), 4);
        assert_eq!(otp.expires_at, 1_000 + 5 * 60 * 1000);
    }

    #[test]
    fn test_otp_verify() {
        let mut user = sample_user("a@x.com");
        assert!(!verify_otp(&user, "1234", 0));

        user.otp = Some("1234".to_string());
        user.otp_expires = Some(500);
        assert!(verify_otp(&user, "1234", 500));
        assert!(!verify_otp(&user, "1235", 100));
        assert!(!verify_otp(&user, "1234", 501));

        user.otp = None;
        assert!(!verify_otp(&user, "1234", 100));
    }

    #[test]
    fn test_otp_forgot_password_ignores_expiry() {
        let mut user = sample_user("a@x.com");
        assert!(!otp_matches(&user, "1234"));
        assert!(!has_stored_otp(&user));

        user.otp = Some("1234".to_string());
        user.otp_expires = Some(500);
        //still accepted long after the window closed
        assert!(otp_matches(&user, "1234"));
        assert!(has_stored_otp(&user));
        assert!(!otp_matches(&user, "1235"));
        assert!(!otp_matches(&user, ""));
    }
}
