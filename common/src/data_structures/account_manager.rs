use chrono::NaiveDate;
use serde_derive::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, EnumString, Display, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AccountStatus {
    Pending,
    Verified,
}

/// Gates whether an account's referral activity yields ledger credit.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, EnumString, Display, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Eligibility {
    Unverified,
    //investment submitted, waiting for admin
    Invested,
    Verified,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, EnumString, Display, PartialEq, Eq)]
pub enum UserRole {
    User,
    Admin,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardSlot {
    First,
    Second,
    Third,
}

impl CardSlot {
    pub const ALL: [CardSlot; 3] = [CardSlot::First, CardSlot::Second, CardSlot::Third];

    pub fn digits(&self) -> usize {
        match self {
            CardSlot::First => 3,
            CardSlot::Second => 5,
            CardSlot::Third => 2,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    pub card_number1: String,
    pub card_number2: String,
    pub card_number3: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoints {
    pub count: u8,
    pub last_claim_date: Option<NaiveDate>,
    pub total_points: u64,
}

/// Every numeric field a points workflow may touch.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PointsLedger {
    pub user_level: u8,
    pub daily_points: DailyPoints,
    pub total_points_earned: u64,
    pub converted_balance: u64,
}

impl Default for PointsLedger {
    fn default() -> Self {
        PointsLedger {
            user_level: 1,
            daily_points: DailyPoints::default(),
            total_points_earned: 0,
            converted_balance: 0,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: i64,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub status: AccountStatus,
    #[serde(skip_serializing)]
    pub otp: Option<String>,
    #[serde(skip_serializing)]
    pub otp_expires: Option<u64>,
    pub eligible: Eligibility,
    pub user_role: UserRole,
    pub payment_image: Option<String>,
    pub card_details: CardDetails,
    //assigned once at creation
    pub referral_link: String,
    pub referred_by: Option<String>,
    #[serde(flatten)]
    pub ledger: PointsLedger,
}

impl UserInfo {
    pub fn is_admin(&self) -> bool {
        self.user_role == UserRole::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_column_roundtrip() {
        assert_eq!(Eligibility::Invested.to_string(), "invested");
        assert_eq!("verified".parse::<Eligibility>(), Ok(Eligibility::Verified));
        assert!("Verified".parse::<Eligibility>().is_err());
        assert!("verified ".parse::<Eligibility>().is_err());
        assert_eq!("Admin".parse::<UserRole>(), Ok(UserRole::Admin));
        assert_eq!(AccountStatus::Pending.to_string(), "pending");
        assert_eq!(
            serde_json::to_value(AccountStatus::Verified).unwrap(),
            serde_json::json!("verified")
        );
        assert_eq!(
            serde_json::from_str::<Eligibility>("\"unverified\"").unwrap(),
            Eligibility::Unverified
        );
    }

    #[test]
    fn test_card_slot_digits() {
        let digits: Vec<usize> = CardSlot::ALL.iter().map(|s| s.digits()).collect();
        assert_eq!(digits, vec![3, 5, 2]);
    }

    #[test]
    fn test_user_info_hides_secrets() {
        let user = UserInfo {
            id: "id".to_string(),
            name: "Ann".to_string(),
            email: "a@x.com".to_string(),
            phone: 123,
            password_hash: "$argon2id$secret".to_string(),
            status: AccountStatus::Pending,
            otp: Some("1234".to_string()),
            otp_expires: Some(1),
            eligible: Eligibility::Unverified,
            user_role: UserRole::User,
            payment_image: None,
            card_details: CardDetails::default(),
            referral_link: "ann/referral/id".to_string(),
            referred_by: None,
            ledger: PointsLedger::default(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("otp").is_none());
        assert_eq!(json["userLevel"], 1);
        assert_eq!(json["dailyPoints"]["count"], 0);
        assert_eq!(json["referralLink"], "ann/referral/id");
    }
}
