//! Gemini REST provider.
//!
//! Sends a single-turn prompt asking for a raw JSON question and parses it
//! out of `candidates[0].content.parts[0].text`, tolerating the ```json
//! fences models like to wrap around it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use trustmarket_types::{Question, QuestionId, Result, TrustmarketError, constants};

use crate::provider::QuestionProvider;

/// Question provider backed by the Gemini `generateContent` endpoint.
#[derive(Debug)]
pub struct GeminiProvider {
    client: Client,
    api_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// The JSON shape the prompt asks the model for.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireQuestion {
    content: String,
    options: Vec<String>,
    correct_answer: String,
    #[serde(default)]
    explanation: String,
}

fn provider_err(reason: impl Into<String>) -> TrustmarketError {
    TrustmarketError::QuestionProvider {
        reason: reason.into(),
    }
}

impl GeminiProvider {
    /// Build a provider. Fails when the key is obviously unusable, so a
    /// misconfigured deployment falls back to the static provider at
    /// startup instead of failing every round.
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.len() < 10 {
            return Err(provider_err("gemini api key missing or too short"));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(constants::QUESTION_TIMEOUT_SECS))
            .build()
            .map_err(|e| provider_err(format!("http client: {e}")))?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key,
        })
    }

    fn prompt(topic: &str) -> String {
        format!(
            "Create one interesting multiple-choice question about '{topic}'. \
             Output RAW JSON only: {{ \"content\": \"...\", \
             \"options\": [\"A. ...\", \"B. ...\", \"C. ...\", \"D. ...\"], \
             \"correctAnswer\": \"A\", \"explanation\": \"...\" }}"
        )
    }

    /// Pull the question JSON out of a model reply, stripping code fences.
    fn parse_reply(raw: &str) -> Result<Question> {
        let clean = raw.replace("```json", "").replace("```", "");
        let wire: WireQuestion = serde_json::from_str(clean.trim())
            .map_err(|e| provider_err(format!("malformed question json: {e}")))?;
        if wire.options.is_empty() {
            return Err(provider_err("question has no options"));
        }
        Ok(Question {
            id: QuestionId::new(),
            text: wire.content,
            options: wire.options,
            correct_answer: wire.correct_answer,
            explanation: wire.explanation,
        })
    }
}

#[async_trait]
impl QuestionProvider for GeminiProvider {
    async fn fetch_question(&self, topic: &str) -> Result<Question> {
        let url = format!("{}?key={}", self.api_url, self.api_key);
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Self::prompt(topic),
                }],
            }],
        };

        debug!(topic, "requesting question from gemini");
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| provider_err(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(provider_err(format!("gemini returned {status}")));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| provider_err(format!("unreadable response: {e}")))?;
        let text = body
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| provider_err("empty candidate list"))?;

        let question = Self::parse_reply(text)?;
        info!(topic, question = %question.id, "question generated");
        Ok(question)
    }
}
