pub mod convert_points;
pub mod daily_claim;
pub mod feedback;
pub mod investment;
pub mod payment_image;
pub mod withdraw_request;

pub use crate::account_manager::handlers::UserReply;
