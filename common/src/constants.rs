use crate::utils::time::{DAY15, MINUTE5};

//otp valid window
pub const OTP_EXPIRE_TIME: u64 = MINUTE5;
//session token lifetime, same as the cookie
pub const TOKEN_EXPIRE_TIME: u64 = DAY15;
pub const SESSION_COOKIE_NAME: &str = "token";

pub const PASSWORD_MIN_LEN: usize = 8;
pub const NAME_MIN_LEN: usize = 3;

//daily claim
pub const DAILY_CLAIM_LIMIT: u8 = 5;
pub const DAILY_CLAIM_POINTS: u64 = 20;

//points needed for one currency unit, both pools
pub const POINTS_TO_CURRENCY_RATE: u64 = 4;

//level derived from lifetime points
pub const LEVEL_POINTS_STEP: u64 = 5000;
pub const MAX_USER_LEVEL: u8 = 100;

//smallest amount that makes an investment count
pub const MIN_INVESTMENT_AMOUNT: u64 = 1000;

//attempts per card slot before giving up
pub const CARD_NUMBER_RETRY_TIMES: u8 = 20;

//数据库连接池大小
pub const PG_POOL_SIZE: usize = 32;

//largest accepted payment image body
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;
