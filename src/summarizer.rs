use crate::types::{NewsError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const TIMEOUT_SECONDS: u64 = 30;

/// Produces a short digest of an article body. Implementations issue exactly
/// one outbound call per invocation and do not retry.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str, topic_hint: Option<&str>) -> Result<String>;
}

/// Build the summarization instruction. The topic hint, when present, is
/// interpolated as a context clause; otherwise the instruction is generic.
pub fn build_prompt(text: &str, topic_hint: Option<&str>) -> String {
    let context = match topic_hint {
        Some(hint) => format!(" The article belongs to the \"{hint}\" news category."),
        None => String::new(),
    };
    format!(
        "Summarize the following news article in 3 to 4 sentences. \
         Stick to the facts, keep a neutral news-style tone, and leave out \
         filler.{context}\n\nArticle:\n\"{text}\""
    )
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
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
    content: Option<Content>,
}

/// Client for the hosted text-generation provider. Constructed only when a
/// credential is available; callers model "summarization unavailable" by not
/// holding a client at all.
pub struct GeminiClient {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECONDS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            api_key: api_key.into(),
            base_url: GEMINI_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl Summarizer for GeminiClient {
    async fn summarize(&self, text: &str, topic_hint: Option<&str>) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(text, topic_hint),
                }],
            }],
        };

        debug!("Requesting summary from model {}", self.model);

        // The credential travels in a header so it can never surface in an
        // error message carrying the URL.
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| NewsError::Summarization(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NewsError::Summarization(format!(
                "provider returned HTTP {status}"
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| NewsError::Summarization(format!("unreadable response: {e}")))?;

        let summary = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| NewsError::Summarization("provider returned no text".to_string()))?;

        Ok(summary)
    }
}
