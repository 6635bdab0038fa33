//! Progress Tracking
//!
//! XP and levels, daily streaks, word mastery, session statistics and the
//! dashboard views derived from them.

#![warn(missing_docs)]

pub mod error;
pub mod tracker;
pub mod queries;
pub mod persistent;

pub use error::{TrackerError, Result};
pub use tracker::ProgressTracker;
pub use queries::{MasteryBreakdown, ProgressSummary, WeeklyEntry};
pub use persistent::PersistentTracker;
