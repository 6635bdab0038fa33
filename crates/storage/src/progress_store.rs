//! Typed persistence of the progress aggregate.
//!
//! The aggregate is stored as one JSON record under [`PROGRESS_KEY`].
//! Loading never fails on bad data: unreadable fields fall back to their
//! zero values and derived fields are recomputed.

use belajar_core::{ProgressState, TrackerConfig};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{Result, Storage};

/// Fixed storage key of the progress record.
pub const PROGRESS_KEY: &str = "belajar-progress";

/// Load the progress aggregate.
///
/// Only storage I/O errors are returned; a missing or malformed record
/// yields (partially) default state.
pub async fn load_progress<S: Storage + ?Sized>(
    storage: &S,
    config: &TrackerConfig,
) -> Result<ProgressState> {
    let Some(raw) = storage.load(PROGRESS_KEY).await? else {
        debug!("no stored progress, starting fresh");
        return Ok(ProgressState::default());
    };

    let mut state = decode_lenient(&raw);
    if state.repair(config) {
        warn!("stored progress violated invariants, repaired on load");
    }
    Ok(state)
}

/// Save the progress aggregate.
pub async fn save_progress<S: Storage + ?Sized>(storage: &S, state: &ProgressState) -> Result<()> {
    let json = serde_json::to_string_pretty(state)?;
    storage.save(PROGRESS_KEY, &json).await
}

/// Delete the stored progress record.
pub async fn clear_progress<S: Storage + ?Sized>(storage: &S) -> Result<()> {
    storage.remove(PROGRESS_KEY).await
}

fn decode_lenient(raw: &str) -> ProgressState {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "stored progress is not valid JSON, starting fresh");
            return ProgressState::default();
        }
    };

    match serde_json::from_value::<ProgressState>(value.clone()) {
        Ok(state) => state,
        Err(e) => {
            warn!(error = %e, "stored progress is malformed, salvaging readable fields");
            match value {
                Value::Object(map) => salvage(&map),
                _ => ProgressState::default(),
            }
        }
    }
}

/// Decode field by field, defaulting whatever does not parse.
fn salvage(map: &Map<String, Value>) -> ProgressState {
    let defaults = ProgressState::default();
    ProgressState {
        total_xp: field(map, "totalXP").unwrap_or(defaults.total_xp),
        current_level: field(map, "currentLevel").unwrap_or(defaults.current_level),
        current_streak: field(map, "currentStreak").unwrap_or(defaults.current_streak),
        longest_streak: field(map, "longestStreak").unwrap_or(defaults.longest_streak),
        last_practice_date: field(map, "lastPracticeDate").unwrap_or(defaults.last_practice_date),
        words: field(map, "words").unwrap_or(defaults.words),
        sessions: field(map, "sessions").unwrap_or(defaults.sessions),
        daily_activity: field(map, "dailyActivity").unwrap_or(defaults.daily_activity),
        mode_stats: field(map, "modeStats").unwrap_or(defaults.mode_stats),
    }
}

fn field<T: DeserializeOwned>(map: &Map<String, Value>, name: &str) -> Option<T> {
    let value = map.get(name)?;
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(field = name, error = %e, "dropping unreadable progress field");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{JsonStorage, MemoryStorage};
    use belajar_core::{PracticeMode, SessionRecord, WordProgress};
    use chrono::{NaiveDate, Utc};

    fn sample() -> ProgressState {
        let mut state = ProgressState {
            total_xp: 180,
            current_streak: 3,
            longest_streak: 5,
            last_practice_date: NaiveDate::from_ymd_opt(2024, 8, 17),
            ..Default::default()
        };
        state.sync_level();
        let mut word = WordProgress::new("merdeka");
        word.record_attempt(true, Utc::now());
        state.words.insert(word.word.clone(), word);
        state.sessions.push_front(
            SessionRecord::new(PracticeMode::Quiz, 80, 0.5, 10, 240, Utc::now()).unwrap(),
        );
        state
    }

    #[tokio::test]
    async fn test_missing_record_is_default() {
        let storage = MemoryStorage::new();
        let state = load_progress(&storage, &TrackerConfig::default()).await.unwrap();
        assert_eq!(state, ProgressState::default());
    }

    #[tokio::test]
    async fn test_save_load_round_trip() {
        let storage = MemoryStorage::new();
        let state = sample();
        save_progress(&storage, &state).await.unwrap();
        let loaded = load_progress(&storage, &TrackerConfig::default()).await.unwrap();
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn test_round_trip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        let state = sample();
        save_progress(&storage, &state).await.unwrap();

        let reopened = JsonStorage::new(dir.path()).await.unwrap();
        let loaded = load_progress(&reopened, &TrackerConfig::default()).await.unwrap();
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn test_invalid_json_defaults() {
        let storage = MemoryStorage::new();
        storage.save(PROGRESS_KEY, "{not json").await.unwrap();
        let state = load_progress(&storage, &TrackerConfig::default()).await.unwrap();
        assert_eq!(state, ProgressState::default());

        storage.save(PROGRESS_KEY, "[1, 2]").await.unwrap();
        let state = load_progress(&storage, &TrackerConfig::default()).await.unwrap();
        assert_eq!(state, ProgressState::default());
    }

    #[tokio::test]
    async fn test_malformed_fields_are_salvaged() {
        let storage = MemoryStorage::new();
        storage
            .save(
                PROGRESS_KEY,
                r#"{
                    "totalXP": 300,
                    "currentLevel": "high",
                    "currentStreak": 2,
                    "longestStreak": -4,
                    "lastPracticeDate": "not a date",
                    "words": {"air": {"word": "air", "correctCount": 2, "totalAttempts": 2}}
                }"#,
            )
            .await
            .unwrap();

        let state = load_progress(&storage, &TrackerConfig::default()).await.unwrap();
        assert_eq!(state.total_xp, 300);
        assert_eq!(state.current_level, 3);
        assert_eq!(state.current_streak, 2);
        assert_eq!(state.longest_streak, 2);
        assert_eq!(state.last_practice_date, None);
        assert_eq!(state.words["air"].correct_count, 2);
    }

    #[tokio::test]
    async fn test_clear_progress() {
        let storage = MemoryStorage::new();
        save_progress(&storage, &sample()).await.unwrap();
        clear_progress(&storage).await.unwrap();
        assert!(storage.is_empty().await);
    }
}
