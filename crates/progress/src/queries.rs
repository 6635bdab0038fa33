//! Read-only views over the tracker state, for dashboards.

use belajar_core::{
    DailyActivity, Day, LevelProgress, Mastery, ModeStats, PracticeMode, SessionRecord, WordProgress,
};
use chrono::Duration;
use serde::Serialize;

use crate::ProgressTracker;

/// One day of the activity window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyEntry {
    /// Calendar day
    pub date: Day,

    /// Recorded activity, zero-valued if none
    pub activity: DailyActivity,
}

/// Number of words per mastery bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MasteryBreakdown {
    /// Words still new
    pub new: usize,
    /// Words being learned
    pub learning: usize,
    /// Familiar words
    pub familiar: usize,
    /// Mastered words
    pub mastered: usize,
}

impl MasteryBreakdown {
    /// Count for one bucket.
    pub fn count(&self, mastery: Mastery) -> usize {
        match mastery {
            Mastery::New => self.new,
            Mastery::Learning => self.learning,
            Mastery::Familiar => self.familiar,
            Mastery::Mastered => self.mastered,
        }
    }

    /// Words tracked in total.
    pub fn total(&self) -> usize {
        self.new + self.learning + self.familiar + self.mastered
    }
}

/// Headline numbers for the home dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    /// Total XP
    pub total_xp: u64,
    /// Level and progress toward the next one
    pub level: LevelProgress,
    /// Current daily streak
    pub current_streak: u32,
    /// Best daily streak
    pub longest_streak: u32,
    /// Words per mastery bucket
    pub mastery: MasteryBreakdown,
    /// Sessions in the log
    pub sessions_logged: usize,
    /// Today's activity
    pub today: DailyActivity,
}

impl ProgressTracker {
    /// All words currently in the given mastery bucket.
    pub fn words_by_mastery(&self, mastery: Mastery) -> Vec<&WordProgress> {
        self.state()
            .words
            .values()
            .filter(|w| w.mastery == mastery)
            .collect()
    }

    /// Attempted words that are not mastered, lowest accuracy first.
    ///
    /// `None` uses the configured default limit.
    pub fn weak_words(&self, limit: Option<usize>) -> Vec<&WordProgress> {
        let limit = limit.unwrap_or(self.config().weak_words_limit);
        let mut weak: Vec<&WordProgress> = self
            .state()
            .words
            .values()
            .filter(|w| w.mastery != Mastery::Mastered && w.total_attempts > 0)
            .collect();
        weak.sort_by(|a, b| a.accuracy().total_cmp(&b.accuracy()));
        weak.truncate(limit);
        weak
    }

    /// Today's activity, zero-valued if nothing was recorded yet.
    pub fn today_activity(&self) -> DailyActivity {
        self.state().activity_on(self.today())
    }

    /// The trailing activity window, oldest first and ending today.
    ///
    /// Always has exactly `weekly_window_days` entries (7 by default).
    pub fn weekly_activity(&self) -> Vec<WeeklyEntry> {
        let today = self.today();
        let days = i64::from(self.config().weekly_window_days.max(1));
        (0..days)
            .rev()
            .map(|offset| {
                let date = today - Duration::days(offset);
                WeeklyEntry {
                    date,
                    activity: self.state().activity_on(date),
                }
            })
            .collect()
    }

    /// Average accuracy recorded for a mode, 0 if never practiced.
    pub fn mode_accuracy(&self, mode: PracticeMode) -> f64 {
        self.mode_stats(mode).average_accuracy
    }

    /// Statistics for a mode, zero-valued if never practiced.
    pub fn mode_stats(&self, mode: PracticeMode) -> ModeStats {
        self.state().mode_stats.get(&mode).copied().unwrap_or_default()
    }

    /// Most recent sessions, newest first.
    pub fn recent_sessions(&self, limit: usize) -> Vec<&SessionRecord> {
        self.state().sessions.iter().take(limit).collect()
    }

    /// Number of words in each mastery bucket.
    pub fn mastery_breakdown(&self) -> MasteryBreakdown {
        let mut breakdown = MasteryBreakdown::default();
        for word in self.state().words.values() {
            match word.mastery {
                Mastery::New => breakdown.new += 1,
                Mastery::Learning => breakdown.learning += 1,
                Mastery::Familiar => breakdown.familiar += 1,
                Mastery::Mastered => breakdown.mastered += 1,
            }
        }
        breakdown
    }

    /// Headline numbers for the home dashboard.
    pub fn summary(&self) -> ProgressSummary {
        let state = self.state();
        ProgressSummary {
            total_xp: state.total_xp,
            level: state.level_progress(),
            current_streak: state.current_streak,
            longest_streak: state.longest_streak,
            mastery: self.mastery_breakdown(),
            sessions_logged: state.sessions.len(),
            today: self.today_activity(),
        }
    }
}
