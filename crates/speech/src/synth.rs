//! Text-to-speech contract.

use async_trait::async_trait;
use tracing::warn;

use crate::{Result, Voice};

/// Something the app can play back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioClip {
    /// Encoded audio returned by a synthesis service
    Encoded {
        /// MIME type, e.g. `audio/mpeg`
        mime_type: String,
        /// Encoded bytes
        bytes: Vec<u8>,
    },

    /// Degraded playback through the platform's built-in speech
    BuiltIn {
        /// Text to speak
        text: String,
        /// Requested voice
        voice: Voice,
    },
}

impl AudioClip {
    /// True if this clip came from the built-in fallback.
    pub fn is_degraded(&self) -> bool {
        matches!(self, AudioClip::BuiltIn { .. })
    }
}

/// Text-to-speech service.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` with the given voice.
    async fn synthesize(&self, text: &str, voice: &Voice) -> Result<AudioClip>;

    /// Service name, for logs.
    fn name(&self) -> &str;
}

/// Wraps a synthesizer and degrades to built-in speech when it fails.
pub struct FallbackSynthesizer<P> {
    primary: P,
}

impl<P: SpeechSynthesizer> FallbackSynthesizer<P> {
    /// Wrap `primary`.
    pub fn new(primary: P) -> Self {
        Self { primary }
    }
}

#[async_trait]
impl<P: SpeechSynthesizer> SpeechSynthesizer for FallbackSynthesizer<P> {
    async fn synthesize(&self, text: &str, voice: &Voice) -> Result<AudioClip> {
        match self.primary.synthesize(text, voice).await {
            Ok(clip) => Ok(clip),
            Err(e) => {
                warn!(service = self.primary.name(), error = %e, "speech synthesis failed, using built-in voice");
                Ok(AudioClip::BuiltIn {
                    text: text.to_string(),
                    voice: voice.clone(),
                })
            }
        }
    }

    fn name(&self) -> &str {
        self.primary.name()
    }
}
