//! The provider boundary and the static implementation.

use async_trait::async_trait;
use trustmarket_types::{Question, Result};

/// Source of quiz questions for a round.
///
/// Implementations are shared across sessions behind an `Arc`, so methods
/// take `&self` and must be safe to call concurrently.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    /// Produce one multiple-choice question on the given topic.
    async fn fetch_question(&self, topic: &str) -> Result<Question>;
}

/// Provider that always serves the fixed standby question.
///
/// The default when no Gemini key is configured; also convenient in tests
/// because its output is fully deterministic apart from the question id.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticProvider;

#[async_trait]
impl QuestionProvider for StaticProvider {
    async fn fetch_question(&self, _topic: &str) -> Result<Question> {
        Ok(Question::fallback())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_provider_serves_the_fallback() {
        let q = StaticProvider.fetch_question("anything").await.unwrap();
        assert_eq!(q.correct_answer, "A");
        assert_eq!(q.options.len(), 4);
    }

    #[tokio::test]
    async fn static_provider_issues_fresh_ids() {
        let a = StaticProvider.fetch_question("t").await.unwrap();
        let b = StaticProvider.fetch_question("t").await.unwrap();
        assert_ne!(a.id, b.id);
    }
}
