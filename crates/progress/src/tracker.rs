//! Progress tracking service.
//!
//! [`ProgressTracker`] owns the learner's [`ProgressState`] and is the only
//! way to change it. Every operation is one synchronous transition: inputs
//! are validated first, then all effects land together. The aggregate sits
//! behind an `Arc`, so handing out a snapshot is cheap and a later mutation
//! copies the state instead of changing what the snapshot holder sees.

use std::sync::Arc;

use belajar_core::{
    normalize_word, validate_accuracy, Clock, Day, PracticeMode, ProgressState, SessionRecord,
    SystemClock, TrackerConfig, WordProgress, Mastery,
};
use tracing::{debug, info};

use crate::Result;

/// Single-writer owner of the progress aggregate.
pub struct ProgressTracker {
    state: Arc<ProgressState>,
    clock: Arc<dyn Clock>,
    config: TrackerConfig,
}

impl ProgressTracker {
    /// Create a tracker over existing state, using the wall clock.
    pub fn new(state: ProgressState) -> Self {
        let mut tracker = Self {
            state: Arc::new(state),
            clock: Arc::new(SystemClock),
            config: TrackerConfig::default(),
        };
        tracker.repair();
        tracker
    }

    /// Use a different clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use a different configuration.
    pub fn with_config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self.repair();
        self
    }

    /// Current state.
    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    /// Shared handle to the current state. Unaffected by later mutations.
    pub fn snapshot(&self) -> Arc<ProgressState> {
        Arc::clone(&self.state)
    }

    /// Active configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Today's calendar day according to the tracker's clock.
    pub fn today(&self) -> Day {
        self.clock.today()
    }

    fn state_mut(&mut self) -> &mut ProgressState {
        Arc::make_mut(&mut self.state)
    }

    fn repair(&mut self) {
        // Probe on a copy so a consistent state is never cloned for nothing.
        let mut probe = (*self.state).clone();
        if probe.repair(&self.config) {
            self.state = Arc::new(probe);
        }
    }

    /// Add XP and recompute the level. Returns the level afterwards.
    pub fn add_xp(&mut self, amount: u64) -> u32 {
        let state = self.state_mut();
        let before = state.current_level;
        state.total_xp = state.total_xp.saturating_add(amount);
        state.sync_level();

        if state.current_level > before {
            info!(level = state.current_level, total_xp = state.total_xp, "level up");
        }
        debug!(amount, total_xp = state.total_xp, "xp added");
        state.current_level
    }

    /// Log a completed session and fold it into every aggregate: the session
    /// log, today's activity, the mode statistics, XP/level and the daily
    /// streak.
    pub fn record_session(
        &mut self,
        mode: PracticeMode,
        score: u32,
        accuracy: f64,
        items_completed: u32,
        duration_secs: u32,
    ) -> Result<SessionRecord> {
        let accuracy = validate_accuracy(accuracy)?;
        let now = self.clock.now();
        let today = self.clock.today();
        let capacity = self.config.session_log_capacity;

        let record = SessionRecord::new(mode, score, accuracy, items_completed, duration_secs, now)?;

        let state = self.state_mut();
        state.sessions.push_front(record.clone());
        state.sessions.truncate(capacity);

        state
            .daily_activity
            .entry(today)
            .or_default()
            .add_session(duration_secs, score);

        state.mode_stats.entry(mode).or_default().record(score, accuracy);

        let level_before = state.current_level;
        state.total_xp = state.total_xp.saturating_add(u64::from(score));
        state.sync_level();
        if state.current_level > level_before {
            info!(level = state.current_level, total_xp = state.total_xp, "level up");
        }

        advance_streak(state, today);

        info!(
            id = %record.id,
            %mode,
            score,
            accuracy,
            streak = state.current_streak,
            "session recorded"
        );
        Ok(record)
    }

    /// Record one attempt at a word and return its updated progress.
    pub fn update_word_progress(
        &mut self,
        word: &str,
        correct: bool,
        translation: Option<&str>,
    ) -> Result<WordProgress> {
        let key = normalize_word(word)?;
        let now = self.clock.now();
        let today = self.clock.today();

        let state = self.state_mut();
        let progress = state
            .words
            .entry(key.clone())
            .or_insert_with(|| WordProgress::new(key.clone()));

        let previous = progress.record_attempt(correct, now);
        if let Some(translation) = translation.map(str::trim).filter(|t| !t.is_empty()) {
            progress.translation = Some(translation.to_string());
        }
        let updated = progress.clone();

        if previous == Mastery::New && updated.mastery != Mastery::New {
            state.daily_activity.entry(today).or_default().add_word_learned();
            info!(word = %key, mastery = %updated.mastery, "word learned");
        }

        debug!(
            word = %key,
            correct,
            mastery = %updated.mastery,
            streak = updated.streak_count,
            "word attempt recorded"
        );
        Ok(updated)
    }

    /// Break a stale practice streak: if the last session was more than one
    /// day ago, the current streak drops to 0. The longest streak is kept.
    ///
    /// Returns true if the streak was reset.
    pub fn check_and_update_streak(&mut self) -> bool {
        let today = self.clock.today();
        let stale = match self.state.last_practice_date {
            Some(last) => last != today && days_between(last, today) > 1,
            None => false,
        };
        if !stale || self.state.current_streak == 0 {
            return false;
        }

        let state = self.state_mut();
        info!(lost = state.current_streak, "practice streak expired");
        state.current_streak = 0;
        true
    }

    /// Clear all progress.
    pub fn reset(&mut self) {
        self.state = Arc::new(ProgressState::default());
        info!("progress reset");
    }
}

fn days_between(earlier: Day, later: Day) -> i64 {
    later.signed_duration_since(earlier).num_days()
}

/// Apply a session on `today` to the daily streak.
fn advance_streak(state: &mut ProgressState, today: Day) {
    state.current_streak = match state.last_practice_date {
        None => 1,
        Some(last) => match days_between(last, today) {
            1 => state.current_streak.saturating_add(1),
            gap if gap > 1 => 1,
            // Same day, or the clock moved backwards.
            _ => state.current_streak,
        },
    };
    state.longest_streak = state.longest_streak.max(state.current_streak);
    state.last_practice_date = Some(state.last_practice_date.map_or(today, |last| last.max(today)));
}
