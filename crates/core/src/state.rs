//! The progress aggregate.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::activity::{DailyActivity, ModeStats};
use crate::config::TrackerConfig;
use crate::level::{calculate_level, level_progress, LevelProgress};
use crate::session::{PracticeMode, SessionRecord};
use crate::word::{normalize_word, WordProgress};
use crate::Day;

/// Everything known about one learner's progress.
///
/// Persisted as a single record. Missing fields deserialize to their zero
/// values, so older or partial blobs still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProgressState {
    /// Total XP ever earned
    #[serde(rename = "totalXP")]
    pub total_xp: u64,

    /// Level derived from `total_xp`
    pub current_level: u32,

    /// Consecutive practice days ending at `last_practice_date`
    pub current_streak: u32,

    /// Best streak ever reached
    pub longest_streak: u32,

    /// Last day with a completed session
    pub last_practice_date: Option<Day>,

    /// Word progress keyed by normalized word
    pub words: BTreeMap<String, WordProgress>,

    /// Session log, newest first
    pub sessions: VecDeque<SessionRecord>,

    /// Activity per calendar day
    pub daily_activity: BTreeMap<Day, DailyActivity>,

    /// Running statistics per practice mode
    pub mode_stats: BTreeMap<PracticeMode, ModeStats>,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            total_xp: 0,
            current_level: 1,
            current_streak: 0,
            longest_streak: 0,
            last_practice_date: None,
            words: BTreeMap::new(),
            sessions: VecDeque::new(),
            daily_activity: BTreeMap::new(),
            mode_stats: BTreeMap::new(),
        }
    }
}

impl ProgressState {
    /// Recompute `current_level` from `total_xp`. Returns true if it changed.
    pub fn sync_level(&mut self) -> bool {
        let level = calculate_level(self.total_xp);
        let changed = level != self.current_level;
        self.current_level = level;
        changed
    }

    /// Position inside the current level.
    pub fn level_progress(&self) -> LevelProgress {
        level_progress(self.total_xp)
    }

    /// Look up a word by its raw spelling.
    pub fn word(&self, word: &str) -> Option<&WordProgress> {
        let key = normalize_word(word).ok()?;
        self.words.get(&key)
    }

    /// Activity on `day`, zero-valued when nothing was recorded.
    pub fn activity_on(&self, day: Day) -> DailyActivity {
        self.daily_activity.get(&day).copied().unwrap_or_default()
    }

    /// Restore every derived field and bound after loading untrusted data.
    ///
    /// Returns true if anything had to change.
    pub fn repair(&mut self, config: &TrackerConfig) -> bool {
        let mut changed = self.sync_level();

        if self.longest_streak < self.current_streak {
            self.longest_streak = self.current_streak;
            changed = true;
        }

        for progress in self.words.values_mut() {
            let before = (progress.correct_count, progress.mastery);
            progress.correct_count = progress.correct_count.min(progress.total_attempts);
            progress.refresh_mastery();
            changed |= before != (progress.correct_count, progress.mastery);
        }

        if self.sessions.len() > config.session_log_capacity {
            self.sessions.truncate(config.session_log_capacity);
            changed = true;
        }

        changed
    }
}
