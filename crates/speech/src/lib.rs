//! Speech and evaluation collaborators.
//!
//! The app hands text-to-speech and answer grading to remote services. This
//! crate defines the contracts those services are consumed through, and
//! the local fallbacks used when a service is unavailable.

#![warn(missing_docs)]

pub mod error;
pub mod voice;
pub mod synth;
pub mod evaluate;
pub mod heuristic;

pub use error::{SpeechError, Result};
pub use voice::{Language, Voice};
pub use synth::{AudioClip, FallbackSynthesizer, SpeechSynthesizer};
pub use evaluate::{Evaluation, EvaluationContext, FallbackEvaluator, ResponseEvaluator};
pub use heuristic::HeuristicEvaluator;
