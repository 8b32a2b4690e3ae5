//! Level and referral award rules.
use common::constants::{LEVEL_POINTS_STEP, MAX_USER_LEVEL};

/// Level boost from the number of referral entries.
pub fn referral_threshold_level(referral_count: u64) -> u8 {
    match referral_count {
        c if c >= 20 => 4,
        c if c >= 10 => 3,
        c if c >= 3 => 2,
        _ => 1,
    }
}

pub fn points_level(points_earned: u64) -> u8 {
    let level = points_earned / LEVEL_POINTS_STEP + 1;
    level.min(MAX_USER_LEVEL as u64) as u8
}

/// Highest of the current, point derived and count derived levels. Never goes down.
pub fn recompute_level(current: u8, points_earned: u64, referral_count: u64) -> u8 {
    current
        .max(points_level(points_earned))
        .max(referral_threshold_level(referral_count))
}

pub fn referral_points_for_level(level: u8) -> u64 {
    match level {
        2 => 1400,
        3 => 2000,
        4 => 2500,
        _ => 1000,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_points() {
        assert_eq!(points_level(0), 1);
        assert_eq!(points_level(4999), 1);
        assert_eq!(points_level(5000), 2);
        assert_eq!(points_level(1_000_000), 100);
    }

    #[test]
    fn test_level_threshold() {
        assert_eq!(referral_threshold_level(2), 1);
        assert_eq!(referral_threshold_level(3), 2);
        assert_eq!(referral_threshold_level(10), 3);
        assert_eq!(referral_threshold_level(25), 4);
    }

    #[test]
    fn test_level_never_decreases() {
        assert_eq!(recompute_level(3, 0, 0), 3);
        assert_eq!(recompute_level(1, 5000, 0), 2);
        assert_eq!(recompute_level(1, 0, 10), 3);
        assert_eq!(recompute_level(2, 15_000, 3), 4);
        let mut level = 1;
        for (points, count) in [(100, 1), (6000, 3), (200, 0), (0, 20), (60_000, 20)] {
            let next = recompute_level(level, points, count);
            assert!(next >= level);
            level = next;
        }
        assert_eq!(level, 13);
    }

    #[test]
    fn test_level_referral_award() {
        assert_eq!(referral_points_for_level(1), 1000);
        assert_eq!(referral_points_for_level(2), 1400);
        assert_eq!(referral_points_for_level(3), 2000);
        assert_eq!(referral_points_for_level(4), 2500);
        assert_eq!(referral_points_for_level(7), 1000);
    }
}
