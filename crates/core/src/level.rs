//! Level math.
//!
//! Completing level `L` costs `100 + (L - 1) * 50` XP. The level is always
//! derived from total XP and never tracked independently.

use serde::{Deserialize, Serialize};

/// XP needed to complete level 1.
pub const BASE_LEVEL_XP: u64 = 100;

/// Additional XP each further level costs.
pub const LEVEL_XP_STEP: u64 = 50;

/// XP required to complete `level`. Levels below 1 are treated as 1.
pub fn xp_for_level(level: u32) -> u64 {
    let level = u64::from(level.max(1));
    BASE_LEVEL_XP.saturating_add((level - 1).saturating_mul(LEVEL_XP_STEP))
}

/// Level reached with `xp` total experience (minimum 1).
pub fn calculate_level(xp: u64) -> u32 {
    walk(xp).0
}

/// Where `xp` sits inside its level.
pub fn level_progress(xp: u64) -> LevelProgress {
    let (level, remaining) = walk(xp);
    LevelProgress {
        level,
        xp_into_level: remaining,
        xp_for_next_level: xp_for_level(level),
    }
}

/// Returns the level for `xp` and the XP left over inside it.
///
/// Completing the first `n` levels costs `25n² + 75n` XP in total, so `n` is
/// estimated from the quadratic root and then corrected to the exact boundary.
fn walk(xp: u64) -> (u32, u64) {
    let target = u128::from(xp);
    let root = (5_625.0 + 100.0 * xp as f64).sqrt();
    let mut completed = ((root - 75.0) / 50.0).max(0.0) as u128;
    while cost_of_levels(completed + 1) <= target {
        completed += 1;
    }
    while completed > 0 && cost_of_levels(completed) > target {
        completed -= 1;
    }
    let remaining = (target - cost_of_levels(completed)) as u64;
    let level = u32::try_from(completed + 1).unwrap_or(u32::MAX);
    (level, remaining)
}

/// Total XP needed to complete levels `1..=n`.
fn cost_of_levels(n: u128) -> u128 {
    25 * n * n + 75 * n
}

/// Progress toward the next level, for dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgress {
    /// Current level
    pub level: u32,

    /// XP earned since the current level started
    pub xp_into_level: u64,

    /// XP the current level costs in total
    pub xp_for_next_level: u64,
}

impl LevelProgress {
    /// Fraction of the current level completed, in `[0, 1)`.
    pub fn fraction(&self) -> f64 {
        if self.xp_for_next_level == 0 {
            return 0.0;
        }
        self.xp_into_level as f64 / self.xp_for_next_level as f64
    }

    /// XP still missing before the next level.
    pub fn xp_remaining(&self) -> u64 {
        self.xp_for_next_level - self.xp_into_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xp_for_level() {
        assert_eq!(xp_for_level(0), 100);
        assert_eq!(xp_for_level(1), 100);
        assert_eq!(xp_for_level(2), 150);
        assert_eq!(xp_for_level(5), 300);
    }

    #[test]
    fn test_calculate_level_boundaries() {
        assert_eq!(calculate_level(0), 1);
        assert_eq!(calculate_level(99), 1);
        assert_eq!(calculate_level(100), 2);
        assert_eq!(calculate_level(249), 2);
        assert_eq!(calculate_level(250), 3);
        assert_eq!(calculate_level(450), 4);
    }

    #[test]
    fn test_level_is_monotonic() {
        let mut previous = 1;
        for xp in (0..5_000).step_by(7) {
            let level = calculate_level(xp);
            assert!(level >= previous);
            previous = level;
        }
    }

    /// Level by repeated subtraction of each level's cost.
    fn level_by_subtraction(xp: u64) -> (u32, u64) {
        let mut level = 1u32;
        let mut remaining = xp;
        while remaining >= xp_for_level(level) {
            remaining -= xp_for_level(level);
            level += 1;
        }
        (level, remaining)
    }

    #[test]
    fn test_closed_form_matches_subtraction() {
        for xp in 0..20_000 {
            assert_eq!(walk(xp), level_by_subtraction(xp), "xp = {xp}");
        }
        for level in [10u32, 137, 1_000, 25_000] {
            let boundary = cost_of_levels(u128::from(level)) as u64;
            for xp in [boundary - 1, boundary, boundary + 1] {
                assert_eq!(walk(xp), level_by_subtraction(xp), "xp = {xp}");
            }
        }
    }

    #[test]
    fn test_calculate_level_at_max_xp() {
        assert_eq!(calculate_level(u64::MAX), 858_993_458);
        let progress = level_progress(u64::MAX);
        assert!(progress.xp_into_level < progress.xp_for_next_level);
    }

    #[test]
    fn test_level_progress() {
        let progress = level_progress(175);
        assert_eq!(progress.level, 2);
        assert_eq!(progress.xp_into_level, 75);
        assert_eq!(progress.xp_for_next_level, 150);
        assert_eq!(progress.xp_remaining(), 75);
        assert!((progress.fraction() - 0.5).abs() < f64::EPSILON);
    }
}
