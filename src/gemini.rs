//! Gemini `generateContent` client used as the primary extractor.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::primary_extractor::{build_prompt, PrimaryExtractor};
use crate::scan_errors::ScanError;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

pub struct GeminiExtractor {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiExtractor {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    /// Point the client at another endpoint (proxies, local mocks)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// Concatenate the text parts of the first candidate
pub fn reply_text(body: &Value) -> Option<String> {
    let parts = body["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[async_trait]
impl PrimaryExtractor for GeminiExtractor {
    fn name(&self) -> &str {
        &self.model
    }

    async fn submit_text(&self, raw: &str) -> Result<String, ScanError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": build_prompt(raw) }] }],
            "generationConfig": { "temperature": 0.1 },
        });

        debug!("Requesting extraction from {} with model {}", self.base_url, self.model);

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ScanError::Service(format!("API error {status}: {body}")));
        }

        let body: Value = response.json().await?;
        reply_text(&body).ok_or_else(|| ScanError::Service("reply had no text parts".to_string()))
    }
}
