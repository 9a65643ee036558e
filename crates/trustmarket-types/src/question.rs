//! Quiz question model.
//!
//! Questions come from an external provider; any failure there substitutes
//! the fixed [`Question::fallback`] so a round can never stall on a slow or
//! broken provider.

use serde::{Deserialize, Serialize};

use crate::QuestionId;

/// A multiple-choice question with its answer key.
///
/// The full struct (including `correct_answer`) stays server-side; public
/// snapshots carry a [`QuestionView`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    /// Options prefixed with their letter, e.g. `"A. Satoshi Nakamoto"`.
    pub options: Vec<String>,
    /// The winning letter, e.g. `"A"`.
    pub correct_answer: String,
    pub explanation: String,
}

impl Question {
    /// The deterministic fallback used whenever the provider fails,
    /// times out, or returns a malformed payload.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            id: QuestionId::new(),
            text: "Who created Bitcoin? (standby question while the provider is busy)"
                .to_string(),
            options: vec![
                "A. Satoshi Nakamoto".to_string(),
                "B. Elon Musk".to_string(),
                "C. Vitalik Buterin".to_string(),
                "D. Mark Zuckerberg".to_string(),
            ],
            correct_answer: "A".to_string(),
            explanation: "Satoshi Nakamoto is the pseudonym of Bitcoin's creator.".to_string(),
        }
    }

    /// The answer-free projection broadcast to players.
    #[must_use]
    pub fn view(&self) -> QuestionView {
        QuestionView {
            id: self.id,
            text: self.text.clone(),
            options: self.options.clone(),
        }
    }
}

/// What players see while the question is live: no answer, no explanation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionView {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<String>,
}
