//! Per-word progress and the mastery policy.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::Time;

const MASTERED_STREAK: u32 = 5;
const MASTERED_ACCURACY: f64 = 0.9;
const FAMILIAR_STREAK: u32 = 3;
const FAMILIAR_ACCURACY: f64 = 0.7;
const LEARNING_ATTEMPTS: u32 = 2;

/// Categorical skill level for a vocabulary word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mastery {
    /// Seen at most once
    #[default]
    New,
    /// Practiced, not yet reliable
    Learning,
    /// Mostly recalled correctly
    Familiar,
    /// Long correct streak with high accuracy
    Mastered,
}

impl Mastery {
    /// Every bucket, lowest first.
    pub const ALL: [Mastery; 4] = [
        Mastery::New,
        Mastery::Learning,
        Mastery::Familiar,
        Mastery::Mastered,
    ];

    /// Apply the mastery policy. First matching rule wins.
    pub fn from_counts(streak_count: u32, correct_count: u32, total_attempts: u32) -> Self {
        let accuracy = ratio(correct_count, total_attempts);
        if streak_count >= MASTERED_STREAK && accuracy >= MASTERED_ACCURACY {
            Mastery::Mastered
        } else if streak_count >= FAMILIAR_STREAK && accuracy >= FAMILIAR_ACCURACY {
            Mastery::Familiar
        } else if total_attempts >= LEARNING_ATTEMPTS {
            Mastery::Learning
        } else {
            Mastery::New
        }
    }

    /// Lowercase name, as persisted.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mastery::New => "new",
            Mastery::Learning => "learning",
            Mastery::Familiar => "familiar",
            Mastery::Mastered => "mastered",
        }
    }
}

impl std::fmt::Display for Mastery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Mastery {
    type Err = CoreError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Mastery::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownMastery(s.to_string()))
    }
}

/// Normalize a word into its storage key (trimmed, lowercase).
pub fn normalize_word(word: &str) -> Result<String> {
    let key = word.trim().to_lowercase();
    if key.is_empty() {
        return Err(CoreError::EmptyWord);
    }
    Ok(key)
}

/// Learning progress for one vocabulary word.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WordProgress {
    /// Normalized word (also the map key)
    pub word: String,

    /// English translation, if known
    pub translation: Option<String>,

    /// Derived mastery bucket
    pub mastery: Mastery,

    /// Correct attempts
    pub correct_count: u32,

    /// All attempts
    pub total_attempts: u32,

    /// Last attempt
    pub last_practiced: Option<Time>,

    /// Consecutive correct attempts
    pub streak_count: u32,
}

impl WordProgress {
    /// Fresh, never-attempted progress for a normalized word.
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            ..Default::default()
        }
    }

    /// Share of correct attempts, 0 when never attempted.
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct_count, self.total_attempts)
    }

    /// Record one attempt and recompute mastery. Returns the mastery held
    /// before the attempt.
    pub fn record_attempt(&mut self, correct: bool, at: Time) -> Mastery {
        let previous = self.mastery;

        self.total_attempts = self.total_attempts.saturating_add(1);
        if correct {
            self.correct_count = self.correct_count.saturating_add(1);
            self.streak_count = self.streak_count.saturating_add(1);
        } else {
            self.streak_count = 0;
        }
        // Persisted data may already be inconsistent; never let it grow worse.
        self.correct_count = self.correct_count.min(self.total_attempts);
        self.last_practiced = Some(at);
        self.refresh_mastery();

        previous
    }

    /// Recompute mastery from the counters.
    pub fn refresh_mastery(&mut self) {
        self.mastery = Mastery::from_counts(self.streak_count, self.correct_count, self.total_attempts);
    }
}

fn ratio(correct: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(correct) / f64::from(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_mastery_policy_table() {
        assert_eq!(Mastery::from_counts(5, 9, 10), Mastery::Mastered);
        assert_eq!(Mastery::from_counts(3, 7, 10), Mastery::Familiar);
        assert_eq!(Mastery::from_counts(0, 0, 2), Mastery::Learning);
        assert_eq!(Mastery::from_counts(0, 0, 0), Mastery::New);
    }

    #[test]
    fn test_mastery_policy_precedence() {
        // Long streak but accuracy below the mastered bar falls to familiar.
        assert_eq!(Mastery::from_counts(6, 8, 10), Mastery::Familiar);
        // Streak too short for familiar, enough attempts for learning.
        assert_eq!(Mastery::from_counts(2, 10, 10), Mastery::Learning);
        // A single attempt stays new even when correct.
        assert_eq!(Mastery::from_counts(1, 1, 1), Mastery::New);
    }

    #[test]
    fn test_normalize_word() {
        assert_eq!(normalize_word("  Rumah ").unwrap(), "rumah");
        assert_eq!(normalize_word("TERIMA KASIH").unwrap(), "terima kasih");
        assert_eq!(normalize_word("   "), Err(CoreError::EmptyWord));
    }

    #[test]
    fn test_record_attempt_counts() {
        let mut word = WordProgress::new("makan");
        let now = Utc::now();

        assert_eq!(word.record_attempt(true, now), Mastery::New);
        assert_eq!(word.mastery, Mastery::New);
        word.record_attempt(false, now);
        assert_eq!(word.correct_count, 1);
        assert_eq!(word.total_attempts, 2);
        assert_eq!(word.streak_count, 0);
        assert_eq!(word.mastery, Mastery::Learning);
        assert_eq!(word.last_practiced, Some(now));
    }

    #[test]
    fn test_record_attempt_reaches_mastered() {
        let mut word = WordProgress::new("air");
        for _ in 0..5 {
            word.record_attempt(true, Utc::now());
        }
        assert_eq!(word.mastery, Mastery::Mastered);
        assert!((word.accuracy() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_record_attempt_repairs_inconsistent_counts() {
        let mut word = WordProgress {
            word: "buku".to_string(),
            correct_count: 9,
            total_attempts: 3,
            ..Default::default()
        };
        word.record_attempt(true, Utc::now());
        assert!(word.correct_count <= word.total_attempts);
    }

    #[test]
    fn test_mastery_from_str() {
        assert_eq!("Mastered".parse::<Mastery>().unwrap(), Mastery::Mastered);
        assert!("expert".parse::<Mastery>().is_err());
    }
}
