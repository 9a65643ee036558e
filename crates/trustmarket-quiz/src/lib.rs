//! # trustmarket-quiz
//!
//! Question sourcing for TrustMarket rounds.
//!
//! The orchestrator talks to a [`QuestionProvider`]; this crate ships two:
//!
//! - [`GeminiProvider`] — calls the Gemini REST API and parses the JSON
//!   question out of the model's reply
//! - [`StaticProvider`] — always serves the fixed fallback question; used
//!   when no API key is configured and in tests
//!
//! Providers return errors rather than fallback questions themselves; the
//! orchestrator decides to substitute [`Question::fallback`] so a round can
//! never stall on a broken provider.
//!
//! [`Question::fallback`]: trustmarket_types::Question::fallback

pub mod gemini;
pub mod provider;

pub use gemini::GeminiProvider;
pub use provider::{QuestionProvider, StaticProvider};
