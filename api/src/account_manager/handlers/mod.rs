pub mod forgot_password;
pub mod login;
pub mod me;
pub mod referred_users;
pub mod signup;
pub mod update_password;
pub mod verify_email;

use common::data_structures::account_manager::UserInfo;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct UserReply {
    pub user: UserInfo,
}
