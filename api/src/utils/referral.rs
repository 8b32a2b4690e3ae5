use common::error_code::AccountManagerError;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("static regex");
}

/// `<slugified-name>/referral/<account id>`, assigned once at signup.
pub fn gen_referral_link(name: &str, user_id: &str) -> String {
    let slug = WHITESPACE.replace_all(&name.to_lowercase(), "-").into_owned();
    format!("{}/referral/{}", slug, user_id)
}

//checked before any lookup
pub fn validate_referral_code(code: &str) -> Result<(), AccountManagerError> {
    if code.split('/').count() < 3 {
        Err(AccountManagerError::ReferralCodeMalformed)
    } else {
        Ok(())
    }
}
