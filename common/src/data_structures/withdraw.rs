use serde_derive::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, EnumString, Display, PartialEq, Eq)]
pub enum WithdrawStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawRequest {
    pub id: String,
    pub user_id: String,
    pub amount: u64,
    pub status: WithdrawStatus,
}
