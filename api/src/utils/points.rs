//! Ledger arithmetic applied between the locked read and the write of an account.
use chrono::NaiveDate;
use common::constants::{DAILY_CLAIM_LIMIT, DAILY_CLAIM_POINTS, POINTS_TO_CURRENCY_RATE};
use common::data_structures::account_manager::PointsLedger;
use common::error_code::RewardsError;

use super::level::recompute_level;

/// Credit lifetime points and refresh the level. The stored level already holds
/// any count based boost, so only the point rule can raise it here.
pub fn earn_points(ledger: &mut PointsLedger, points: u64) {
    ledger.total_points_earned += points;
    ledger.user_level = recompute_level(ledger.user_level, ledger.total_points_earned, 0);
}

/// One daily claim. The counter restarts on the first claim of a new day.
pub fn claim_daily(ledger: &mut PointsLedger, today: NaiveDate) -> Result<u8, RewardsError> {
    let daily = &mut ledger.daily_points;
    if daily.last_claim_date != Some(today) {
        daily.count = 0;
        daily.last_claim_date = Some(today);
    }
    if daily.count >= DAILY_CLAIM_LIMIT {
        Err(RewardsError::DailyClaimLimitReached)?;
    }
    daily.count += 1;
    daily.total_points += DAILY_CLAIM_POINTS;
    let count = daily.count;
    earn_points(ledger, DAILY_CLAIM_POINTS);
    Ok(count)
}

/// Move the daily pool into the balance. Returns the credited amount.
pub fn convert_daily_points(ledger: &mut PointsLedger) -> u64 {
    let converted = ledger.daily_points.total_points / POINTS_TO_CURRENCY_RATE;
    ledger.converted_balance += converted;
    ledger.daily_points.total_points = 0;
    converted
}

/// Sum of the referral entries and the amount credited for them.
/// The caller zeroes every entry.
pub fn convert_referred_points(
    ledger: &mut PointsLedger,
    entries: &[u64],
) -> Result<(u64, u64), RewardsError> {
    if entries.is_empty() {
        Err(RewardsError::NoReferredPoints)?;
    }
    let total: u64 = entries.iter().sum();
    let converted = total / POINTS_TO_CURRENCY_RATE;
    ledger.converted_balance += converted;
    Ok((total, converted))
}

pub fn debit_balance(ledger: &mut PointsLedger, amount: u64) -> Result<(), RewardsError> {
    ledger.converted_balance = ledger
        .converted_balance
        .checked_sub(amount)
        .ok_or(RewardsError::InsufficientBalance)?;
    Ok(())
}
