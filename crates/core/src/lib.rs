//! Belajar core data models.
//!
//! This crate defines the learner progress aggregate and the pure rules
//! that govern it: level math, the word mastery policy, session log entries,
//! daily activity and per-mode statistics. Nothing here performs I/O.

#![warn(missing_docs)]

// Identities and time
mod id;
mod clock;

// Rules
mod level;
mod word;

// Aggregated records
mod session;
mod activity;
mod state;

mod config;
mod error;

// Re-exports
pub use id::*;
pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "test-util"))]
pub use clock::ManualClock;

pub use level::{calculate_level, level_progress, xp_for_level, LevelProgress, BASE_LEVEL_XP, LEVEL_XP_STEP};
pub use word::{normalize_word, Mastery, WordProgress};

pub use session::{validate_accuracy, PracticeMode, SessionRecord};
pub use activity::{minutes_for_duration, DailyActivity, ModeStats};
pub use state::ProgressState;

pub use config::TrackerConfig;
pub use error::{CoreError, Result};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;

/// Calendar day type (local date, serialized as `YYYY-MM-DD`)
pub type Day = chrono::NaiveDate;
