pub mod account_manager;
pub mod feedback;
pub mod referral;
pub mod withdraw;
