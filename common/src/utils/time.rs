use chrono::prelude::*;

pub const MINUTE1: u64 = 60 * 1000;

pub const MINUTE5: u64 = 5 * MINUTE1;

pub const HOUR1: u64 = 60 * MINUTE1;

pub const DAY1: u64 = 24 * HOUR1;
pub const DAY15: u64 = 15 * DAY1;

pub fn now_millis() -> u64 {
    Local::now().timestamp_millis() as u64
}

/// Calendar day used for daily claims, always taken in UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()
}
