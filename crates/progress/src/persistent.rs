//! Tracker bound to a storage backend.
//!
//! Each successful mutation publishes the new snapshot on a watch channel.
//! A background task saves the latest published snapshot; the caller never
//! waits for it and save failures are only logged. Observers can subscribe
//! to the same channel.

use std::sync::Arc;

use belajar_core::{
    Clock, PracticeMode, ProgressState, SessionRecord, SystemClock, TrackerConfig,
    WordProgress,
};
use belajar_storage::{load_progress, save_progress, Storage};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{ProgressTracker, Result, TrackerError};

/// A [`ProgressTracker`] that persists itself after every change.
pub struct PersistentTracker {
    tracker: ProgressTracker,
    publisher: watch::Sender<Arc<ProgressState>>,
    persister: JoinHandle<()>,
}

impl PersistentTracker {
    /// Load progress from `storage` and start the persister, using the wall
    /// clock and default configuration.
    pub async fn open(storage: Arc<dyn Storage>) -> Result<Self> {
        Self::open_with(storage, Arc::new(SystemClock), TrackerConfig::default()).await
    }

    /// Load progress from `storage` and start the persister.
    ///
    /// A streak that went stale since the last run is decayed right away.
    pub async fn open_with(
        storage: Arc<dyn Storage>,
        clock: Arc<dyn Clock>,
        config: TrackerConfig,
    ) -> Result<Self> {
        let state = load_progress(storage.as_ref(), &config).await?;
        let tracker = ProgressTracker::new(state)
            .with_clock(clock)
            .with_config(config);

        let (publisher, receiver) = watch::channel(tracker.snapshot());
        let persister = tokio::spawn(run_persister(storage, receiver));
        info!(
            total_xp = tracker.state().total_xp,
            words = tracker.state().words.len(),
            "progress loaded"
        );

        let mut persistent = Self {
            tracker,
            publisher,
            persister,
        };
        if persistent.tracker.check_and_update_streak() {
            persistent.publish();
        }
        Ok(persistent)
    }

    /// The in-memory tracker, for queries.
    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    /// Current state.
    pub fn state(&self) -> &ProgressState {
        self.tracker.state()
    }

    /// Receive every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<ProgressState>> {
        self.publisher.subscribe()
    }

    fn publish(&self) {
        self.publisher.send_replace(self.tracker.snapshot());
    }

    /// See [`ProgressTracker::add_xp`].
    pub fn add_xp(&mut self, amount: u64) -> u32 {
        let level = self.tracker.add_xp(amount);
        self.publish();
        level
    }

    /// See [`ProgressTracker::record_session`].
    pub fn record_session(
        &mut self,
        mode: PracticeMode,
        score: u32,
        accuracy: f64,
        items_completed: u32,
        duration_secs: u32,
    ) -> Result<SessionRecord> {
        let record = self
            .tracker
            .record_session(mode, score, accuracy, items_completed, duration_secs)?;
        self.publish();
        Ok(record)
    }

    /// See [`ProgressTracker::update_word_progress`].
    pub fn update_word_progress(
        &mut self,
        word: &str,
        correct: bool,
        translation: Option<&str>,
    ) -> Result<WordProgress> {
        let progress = self.tracker.update_word_progress(word, correct, translation)?;
        self.publish();
        Ok(progress)
    }

    /// See [`ProgressTracker::check_and_update_streak`].
    pub fn check_and_update_streak(&mut self) -> bool {
        let reset = self.tracker.check_and_update_streak();
        if reset {
            self.publish();
        }
        reset
    }

    /// See [`ProgressTracker::reset`].
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.publish();
    }

    /// Stop publishing and wait until the last snapshot is saved.
    pub async fn shutdown(self) -> Result<()> {
        let Self {
            publisher,
            persister,
            ..
        } = self;
        drop(publisher);
        persister
            .await
            .map_err(|e| TrackerError::Persister(e.to_string()))
    }
}

async fn run_persister(
    storage: Arc<dyn Storage>,
    mut receiver: watch::Receiver<Arc<ProgressState>>,
) {
    // `changed` still reports an unseen value after the sender is gone, so
    // the final snapshot is always flushed before the loop ends.
    while receiver.changed().await.is_ok() {
        let snapshot = receiver.borrow_and_update().clone();
        match save_progress(storage.as_ref(), &snapshot).await {
            Ok(()) => debug!(total_xp = snapshot.total_xp, "progress saved"),
            Err(e) => warn!(error = %e, "failed to save progress"),
        }
    }
    debug!("persister stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use belajar_core::{Day, ManualClock};
    use belajar_storage::{JsonStorage, MemoryStorage, PROGRESS_KEY};
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> Day {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn open_on(storage: Arc<dyn Storage>, clock: Arc<ManualClock>) -> PersistentTracker {
        PersistentTracker::open_with(storage, clock, TrackerConfig::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_changes_are_flushed_on_shutdown() {
        let storage = Arc::new(MemoryStorage::new());
        let clock = Arc::new(ManualClock::on(day(2024, 9, 1)));

        let mut tracker = open_on(storage.clone(), clock.clone()).await;
        tracker.record_session(PracticeMode::Listening, 70, 0.5, 10, 600).unwrap();
        tracker.update_word_progress("Pintu", true, Some("door")).unwrap();
        tracker.add_xp(30);
        let expected = tracker.state().clone();
        tracker.shutdown().await.unwrap();

        let reopened = open_on(storage, clock).await;
        assert_eq!(*reopened.state(), expected);
        assert_eq!(reopened.state().total_xp, 100);
        assert_eq!(reopened.state().current_level, 2);
    }

    #[tokio::test]
    async fn test_failed_validation_publishes_nothing() {
        let storage = Arc::new(MemoryStorage::new());
        let clock = Arc::new(ManualClock::on(day(2024, 9, 1)));

        let mut tracker = open_on(storage.clone(), clock).await;
        let receiver = tracker.subscribe();
        assert!(tracker.update_word_progress("  ", true, None).is_err());
        assert!(!receiver.has_changed().unwrap());
        tracker.shutdown().await.unwrap();

        assert_eq!(storage.load(PROGRESS_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_subscribers_see_snapshots() {
        let storage = Arc::new(MemoryStorage::new());
        let clock = Arc::new(ManualClock::on(day(2024, 9, 1)));

        let mut tracker = open_on(storage, clock).await;
        let mut receiver = tracker.subscribe();
        tracker.add_xp(120);

        receiver.changed().await.unwrap();
        let snapshot = receiver.borrow_and_update().clone();
        assert_eq!(snapshot.total_xp, 120);
        assert_eq!(snapshot.current_level, 2);

        tracker.add_xp(5);
        assert_eq!(snapshot.total_xp, 120);
        tracker.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_stale_streak_decays_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let storage: Arc<dyn Storage> = Arc::new(JsonStorage::new(dir.path()).await.unwrap());
        let clock = Arc::new(ManualClock::on(day(2024, 9, 1)));

        let mut tracker = open_on(storage.clone(), clock.clone()).await;
        tracker.record_session(PracticeMode::Quiz, 10, 1.0, 1, 60).unwrap();
        clock.advance_days(1);
        tracker.record_session(PracticeMode::Quiz, 10, 1.0, 1, 60).unwrap();
        tracker.shutdown().await.unwrap();

        clock.advance_days(4);
        let tracker = open_on(storage.clone(), clock.clone()).await;
        assert_eq!(tracker.state().current_streak, 0);
        assert_eq!(tracker.state().longest_streak, 2);
        tracker.shutdown().await.unwrap();

        let reloaded = open_on(storage, clock).await;
        assert_eq!(reloaded.state().current_streak, 0);
    }

    #[tokio::test]
    async fn test_reset_is_persisted() {
        let storage = Arc::new(MemoryStorage::new());
        let clock = Arc::new(ManualClock::on(day(2024, 9, 1)));

        let mut tracker = open_on(storage.clone(), clock.clone()).await;
        tracker.add_xp(400);
        tracker.reset();
        tracker.shutdown().await.unwrap();

        let reopened = open_on(storage, clock).await;
        assert_eq!(*reopened.state(), ProgressState::default());
    }
}
