//! Answer evaluation contract.

use async_trait::async_trait;
use belajar_core::PracticeMode;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{HeuristicEvaluator, Language, Result};

/// What the learner was doing when the answer was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationContext {
    /// Practice mode
    pub mode: PracticeMode,

    /// Prompt shown to the learner, if any
    pub prompt: Option<String>,

    /// Language the answer should be in
    pub language: Language,
}

impl EvaluationContext {
    /// Context with no prompt.
    pub fn new(mode: PracticeMode, language: Language) -> Self {
        Self {
            mode,
            prompt: None,
            language,
        }
    }
}

/// Structured grade for one answer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    /// Score from 0 to 100
    pub score: u8,

    /// One-line feedback
    pub feedback: String,

    /// Remark on pronunciation, if assessed
    pub pronunciation_note: Option<String>,

    /// Remark on grammar or formatting
    pub grammar_note: Option<String>,

    /// Concrete things to try next
    pub suggestions: Vec<String>,
}

/// Grades a learner's answer against the expected text.
#[async_trait]
pub trait ResponseEvaluator: Send + Sync {
    /// Compare `actual` to `expected`.
    async fn evaluate(
        &self,
        expected: &str,
        actual: &str,
        context: &EvaluationContext,
    ) -> Result<Evaluation>;

    /// Service name, for logs.
    fn name(&self) -> &str;
}

/// Wraps an evaluator and grades locally when it fails.
pub struct FallbackEvaluator<P> {
    primary: P,
    fallback: HeuristicEvaluator,
}

impl<P: ResponseEvaluator> FallbackEvaluator<P> {
    /// Wrap `primary` with the default heuristic.
    pub fn new(primary: P) -> Self {
        Self {
            primary,
            fallback: HeuristicEvaluator::default(),
        }
    }
}

#[async_trait]
impl<P: ResponseEvaluator> ResponseEvaluator for FallbackEvaluator<P> {
    async fn evaluate(
        &self,
        expected: &str,
        actual: &str,
        context: &EvaluationContext,
    ) -> Result<Evaluation> {
        match self.primary.evaluate(expected, actual, context).await {
            Ok(evaluation) => Ok(Evaluation {
                score: evaluation.score.min(100),
                ..evaluation
            }),
            Err(e) => {
                warn!(service = self.primary.name(), error = %e, "evaluation failed, grading locally");
                Ok(self.fallback.grade(expected, actual))
            }
        }
    }

    fn name(&self) -> &str {
        self.primary.name()
    }
}
