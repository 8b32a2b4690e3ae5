use serde_derive::{Deserialize, Serialize};

use super::account_manager::UserInfo;

/// Public fields of a referred account.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReferredUserDetails {
    pub name: String,
    pub email: String,
    pub user_level: u8,
    pub total_points_earned: u64,
    pub referral_link: String,
}

impl From<&UserInfo> for ReferredUserDetails {
    fn from(user: &UserInfo) -> Self {
        ReferredUserDetails {
            name: user.name.clone(),
            email: user.email.clone(),
            user_level: user.ledger.user_level,
            total_points_earned: user.ledger.total_points_earned,
            referral_link: user.referral_link.clone(),
        }
    }
}

/// One line of a referrer's ledger. `user_details` is a snapshot taken on insert.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReferredPoint {
    pub account_id: String,
    //kept after the referred account is deleted
    pub referred_user_id: String,
    pub points: u64,
    pub user_details: ReferredUserDetails,
}
