//! Tracker configuration.

use serde::{Deserialize, Serialize};

/// Tunables for the progress tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Maximum number of sessions kept in the log (oldest evicted)
    pub session_log_capacity: usize,

    /// Default number of weak words returned
    pub weak_words_limit: usize,

    /// Number of days in the activity window, ending today
    pub weekly_window_days: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            session_log_capacity: 100,
            weak_words_limit: 10,
            weekly_window_days: 7,
        }
    }
}
