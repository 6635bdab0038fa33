//! Voice selection.

use serde::{Deserialize, Serialize};

/// Spoken language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Bahasa Indonesia
    Indonesian,
    /// English
    English,
}

impl Language {
    /// BCP 47 tag.
    pub fn tag(&self) -> &'static str {
        match self {
            Language::Indonesian => "id-ID",
            Language::English => "en-US",
        }
    }
}

/// Which voice a synthesizer should use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Voice {
    /// Provider-specific voice id
    pub id: String,

    /// Language the voice speaks
    pub language: Language,
}

impl Voice {
    /// Create a voice selector.
    pub fn new(id: impl Into<String>, language: Language) -> Self {
        Self {
            id: id.into(),
            language,
        }
    }

    /// Default Indonesian voice for prompts.
    pub fn indonesian() -> Self {
        Self::new("id-default", Language::Indonesian)
    }

    /// Default English voice for translations and feedback.
    pub fn english() -> Self {
        Self::new("en-default", Language::English)
    }
}
