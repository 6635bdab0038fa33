//! Per-day and per-mode aggregates.

use serde::{Deserialize, Serialize};

/// Whole minutes for a duration in seconds, rounded half up.
pub fn minutes_for_duration(seconds: u32) -> u32 {
    ((u64::from(seconds) + 30) / 60) as u32
}

/// Activity totals for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DailyActivity {
    /// Minutes practiced
    pub minutes_practiced: u32,

    /// Sessions completed
    pub sessions_completed: u32,

    /// Words that left the `new` bucket
    pub words_learned: u32,

    /// XP earned from sessions
    pub xp_earned: u64,
}

impl DailyActivity {
    /// Fold a completed session into the day.
    pub fn add_session(&mut self, duration_secs: u32, score: u32) {
        self.minutes_practiced = self
            .minutes_practiced
            .saturating_add(minutes_for_duration(duration_secs));
        self.sessions_completed = self.sessions_completed.saturating_add(1);
        self.xp_earned = self.xp_earned.saturating_add(u64::from(score));
    }

    /// Count one newly learned word.
    pub fn add_word_learned(&mut self) {
        self.words_learned = self.words_learned.saturating_add(1);
    }

    /// True if nothing happened that day.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Running statistics for one practice mode.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModeStats {
    /// Sessions completed in this mode
    pub total_sessions: u32,

    /// Sum of session scores
    pub total_score: u64,

    /// Mean session accuracy, in `[0, 1]`
    pub average_accuracy: f64,

    /// Highest session score
    pub best_score: u32,
}

impl ModeStats {
    /// Fold a session into the running statistics.
    pub fn record(&mut self, score: u32, accuracy: f64) {
        let old_count = f64::from(self.total_sessions);
        self.total_sessions = self.total_sessions.saturating_add(1);
        self.total_score = self.total_score.saturating_add(u64::from(score));
        self.average_accuracy =
            (self.average_accuracy * old_count + accuracy) / f64::from(self.total_sessions);
        self.best_score = self.best_score.max(score);
    }

    /// Mean score per session, 0 when none recorded.
    pub fn average_score(&self) -> f64 {
        if self.total_sessions == 0 {
            0.0
        } else {
            self.total_score as f64 / f64::from(self.total_sessions)
        }
    }
}
