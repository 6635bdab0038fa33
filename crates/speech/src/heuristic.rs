//! Offline answer grading.
//!
//! Scores the share of expected words found in the answer (punctuation and
//! case ignored), then checks basic sentence formatting. An answer whose
//! words match exactly always scores 100; formatting problems then only add
//! a grammar note. Deterministic and free of I/O.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::{Evaluation, EvaluationContext, ResponseEvaluator, Result};

const MAX_LISTED_WORDS: usize = 5;

/// Local grader used when the evaluation service is unavailable.
#[derive(Debug, Clone)]
pub struct HeuristicEvaluator {
    formatting_penalty: u8,
}

impl Default for HeuristicEvaluator {
    fn default() -> Self {
        Self {
            formatting_penalty: 5,
        }
    }
}

impl HeuristicEvaluator {
    /// Grader that deducts `penalty` points per formatting problem.
    pub fn with_formatting_penalty(penalty: u8) -> Self {
        Self {
            formatting_penalty: penalty,
        }
    }

    /// Grade `actual` against `expected`.
    pub fn grade(&self, expected: &str, actual: &str) -> Evaluation {
        let expected_tokens = tokens(expected);
        let actual_tokens = tokens(actual);

        if expected_tokens.is_empty() {
            return Evaluation {
                feedback: "Nothing to compare against.".to_string(),
                ..Default::default()
            };
        }
        if actual_tokens.is_empty() {
            return Evaluation {
                feedback: "No answer given.".to_string(),
                suggestions: vec!["Try answering, even partially.".to_string()],
                ..Default::default()
            };
        }

        let mut available: HashMap<&str, usize> = HashMap::new();
        for token in &actual_tokens {
            *available.entry(token.as_str()).or_default() += 1;
        }
        let mut matched = 0usize;
        let mut missing = Vec::new();
        for token in &expected_tokens {
            match available.get_mut(token.as_str()) {
                Some(count) if *count > 0 => {
                    *count -= 1;
                    matched += 1;
                }
                _ => missing.push(token.as_str()),
            }
        }
        let extra: Vec<&str> = actual_tokens
            .iter()
            .map(String::as_str)
            .filter(|t| !expected_tokens.iter().any(|e| e == t))
            .collect();

        let expected_len = expected_tokens.len();
        let overlap = ((100 * matched + expected_len / 2) / expected_len).min(100) as u8;
        let exact = expected_tokens == actual_tokens;

        let mut notes = Vec::new();
        if starts_upper(expected) && starts_lower(actual) {
            notes.push("Start the sentence with a capital letter.");
        }
        if ends_with_terminal(expected) && !ends_with_terminal(actual) {
            notes.push("End the sentence with punctuation.");
        }
        let score = if exact {
            100
        } else {
            let penalty = self.formatting_penalty.saturating_mul(notes.len() as u8);
            overlap.saturating_sub(penalty)
        };

        let mut suggestions = Vec::new();
        if !missing.is_empty() {
            suggestions.push(format!("Include: {}", list(&missing)));
        }
        if !extra.is_empty() {
            suggestions.push(format!("Check these words: {}", list(&extra)));
        }

        Evaluation {
            score,
            feedback: feedback_for(score).to_string(),
            pronunciation_note: None,
            grammar_note: (!notes.is_empty()).then(|| notes.join(" ")),
            suggestions,
        }
    }
}

#[async_trait]
impl ResponseEvaluator for HeuristicEvaluator {
    async fn evaluate(
        &self,
        expected: &str,
        actual: &str,
        _context: &EvaluationContext,
    ) -> Result<Evaluation> {
        Ok(self.grade(expected, actual))
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '\'' || c == '-' { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn first_letter(text: &str) -> Option<char> {
    text.chars().find(|c| c.is_alphabetic())
}

fn starts_upper(text: &str) -> bool {
    first_letter(text).is_some_and(char::is_uppercase)
}

fn starts_lower(text: &str) -> bool {
    first_letter(text).is_some_and(char::is_lowercase)
}

fn ends_with_terminal(text: &str) -> bool {
    text.trim_end().ends_with(['.', '!', '?'])
}

fn list(words: &[&str]) -> String {
    let mut shown: Vec<&str> = Vec::new();
    for &word in words {
        if !shown.contains(&word) {
            shown.push(word);
        }
    }
    shown.truncate(MAX_LISTED_WORDS);
    shown.join(", ")
}

fn feedback_for(score: u8) -> &'static str {
    match score {
        90..=100 => "Excellent!",
        70..=89 => "Good job, almost there.",
        40..=69 => "Partially correct.",
        _ => "Keep practicing.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let result = HeuristicEvaluator::default().grade("I eat rice.", "I eat rice.");
        assert_eq!(result.score, 100);
        assert_eq!(result.feedback, "Excellent!");
        assert!(result.grammar_note.is_none());
        assert!(result.suggestions.is_empty());
    }

    #[test]
    fn test_exact_words_score_full_marks_despite_formatting() {
        let result = HeuristicEvaluator::default().grade("Terima kasih!", "terima kasih");
        assert_eq!(result.score, 100);
        assert_eq!(result.feedback, "Excellent!");
        assert_eq!(
            result.grammar_note.as_deref(),
            Some("Start the sentence with a capital letter. End the sentence with punctuation.")
        );
        assert!(result.suggestions.is_empty());
    }

    #[test]
    fn test_formatting_penalty_applies_to_inexact_answers() {
        let strict = HeuristicEvaluator::with_formatting_penalty(20);
        let result = strict.grade("Terima kasih banyak!", "terima kasih");
        // 2 of 3 expected words rounds to 67, minus two formatting notes
        assert_eq!(result.score, 27);
    }

    #[test]
    fn test_extra_words_do_not_lower_score() {
        let result = HeuristicEvaluator::default().grade("saya makan", "saya makan nasi");
        assert_eq!(result.score, 100);
        assert_eq!(result.suggestions, vec!["Check these words: nasi".to_string()]);
    }

    #[test]
    fn test_partial_answer() {
        let result = HeuristicEvaluator::default().grade("Saya makan nasi.", "saya makan");
        // 67 overlap minus two formatting notes
        assert_eq!(result.score, 57);
        assert_eq!(result.feedback, "Partially correct.");
        assert_eq!(
            result.grammar_note.as_deref(),
            Some("Start the sentence with a capital letter. End the sentence with punctuation.")
        );
        assert_eq!(result.suggestions, vec!["Include: nasi".to_string()]);
    }

    #[test]
    fn test_wrong_words() {
        let result = HeuristicEvaluator::default().grade("Good morning.", "Good night.");
        assert_eq!(result.score, 50);
        assert!(result.suggestions.contains(&"Include: morning".to_string()));
        assert!(result.suggestions.contains(&"Check these words: night".to_string()));
    }

    #[test]
    fn test_empty_inputs() {
        let grader = HeuristicEvaluator::default();
        let none = grader.grade("Hello.", "   ");
        assert_eq!(none.score, 0);
        assert_eq!(none.feedback, "No answer given.");

        let nothing = grader.grade("", "hello");
        assert_eq!(nothing.score, 0);
    }

    #[test]
    fn test_repeated_words_count_once_each() {
        let result = HeuristicEvaluator::default().grade("sama sama", "sama");
        assert_eq!(result.score, 50);
        assert_eq!(result.suggestions, vec!["Include: sama".to_string()]);
    }
}
