//! Practice modes and the session log entry.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::id::SessionId;
use crate::Time;

/// A named practice activity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PracticeMode {
    /// Indonesian word, recall the English meaning
    #[default]
    Flashcards,
    /// Hear Indonesian audio, pick or type the meaning
    Listening,
    /// Read a prompt aloud, evaluated from speech
    Speaking,
    /// Translate full sentences
    Translation,
    /// Free-form dialogue turns
    Conversation,
    /// Mixed multiple-choice review
    Quiz,
}

impl PracticeMode {
    /// Every mode.
    pub const ALL: [PracticeMode; 6] = [
        PracticeMode::Flashcards,
        PracticeMode::Listening,
        PracticeMode::Speaking,
        PracticeMode::Translation,
        PracticeMode::Conversation,
        PracticeMode::Quiz,
    ];

    /// Lowercase name, as persisted.
    pub fn as_str(&self) -> &'static str {
        match self {
            PracticeMode::Flashcards => "flashcards",
            PracticeMode::Listening => "listening",
            PracticeMode::Speaking => "speaking",
            PracticeMode::Translation => "translation",
            PracticeMode::Conversation => "conversation",
            PracticeMode::Quiz => "quiz",
        }
    }
}

impl std::fmt::Display for PracticeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PracticeMode {
    type Err = CoreError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        PracticeMode::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownMode(s.to_string()))
    }
}

/// Check a session accuracy: must be finite, clamped into `[0, 1]`.
pub fn validate_accuracy(accuracy: f64) -> Result<f64> {
    if !accuracy.is_finite() {
        return Err(CoreError::InvalidAccuracy(accuracy));
    }
    Ok(accuracy.clamp(0.0, 1.0))
}

/// Immutable log entry for one completed session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionRecord {
    /// Unique identifier
    pub id: SessionId,

    /// Practice mode
    pub mode: PracticeMode,

    /// Score, also the XP the session awarded
    pub score: u32,

    /// Fraction of items answered correctly, in `[0, 1]`
    pub accuracy: f64,

    /// Items attempted
    pub items_completed: u32,

    /// Duration in seconds
    pub duration: u32,

    /// When the session was recorded
    pub timestamp: Time,
}

impl SessionRecord {
    /// Create a new record with a fresh id.
    pub fn new(
        mode: PracticeMode,
        score: u32,
        accuracy: f64,
        items_completed: u32,
        duration: u32,
        timestamp: Time,
    ) -> Result<Self> {
        Ok(Self {
            id: SessionId::new(),
            mode,
            score,
            accuracy: validate_accuracy(accuracy)?,
            items_completed,
            duration,
            timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_mode_parse() {
        assert_eq!("Speaking".parse::<PracticeMode>().unwrap(), PracticeMode::Speaking);
        assert_eq!(" quiz ".parse::<PracticeMode>().unwrap(), PracticeMode::Quiz);
        assert_eq!(
            "karaoke".parse::<PracticeMode>(),
            Err(CoreError::UnknownMode("karaoke".to_string()))
        );
    }

    #[test]
    fn test_validate_accuracy() {
        assert_eq!(validate_accuracy(0.5).unwrap(), 0.5);
        assert_eq!(validate_accuracy(1.7).unwrap(), 1.0);
        assert_eq!(validate_accuracy(-0.2).unwrap(), 0.0);
        assert!(validate_accuracy(f64::NAN).is_err());
        assert!(validate_accuracy(f64::INFINITY).is_err());
    }

    #[test]
    fn test_session_record_serializes_camel_case() {
        let record = SessionRecord::new(PracticeMode::Listening, 40, 0.75, 8, 300, Utc::now()).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["mode"], "listening");
        assert_eq!(json["itemsCompleted"], 8);
        assert_eq!(json["duration"], 300);
    }
}
