//! # Primary Extractor Module
//!
//! Adapter around the external text-understanding service. The service gets a
//! task instruction with the raw message and answers in free-form text that
//! should contain JSON shaped like `{"appName": "...", "codes": ["..."]}` (or an
//! array of those). Its answer is advisory: every failure becomes "no result"
//! and every code is re-validated downstream.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::circuit_breaker::CircuitBreaker;
use crate::code_model::RawCodeGroup;
use crate::scan_config::{RecoveryConfig, SENTINEL_APP_NAME};
use crate::scan_errors::ScanError;

/// The external capability: submit raw text, get the service's reply text
#[async_trait]
pub trait PrimaryExtractor: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    async fn submit_text(&self, raw: &str) -> Result<String, ScanError>;
}

/// Build the task instruction sent to the service
pub fn build_prompt(raw_text: &str) -> String {
    format!(
        r#"You are a promo code detector.
Analyze the ENTIRE text below (header, body, footer) and extract every app name together with its promo codes.

INPUT TEXT:
"""
{raw_text}
"""

TASKS:
1. App name: usually on the first line, often next to words like "Club", "Win", "Bet", "Mall", "Game".
   "11Win Loot" -> "11Win". "Diwa777 Code" -> "Diwa777". If no name is found use "{SENTINEL_APP_NAME}".
2. Codes: explicit patterns ("Code: ABC", "Gift >> 1234", "Redeem - XYZ") and standalone
   alphanumeric strings that look like codes ("DIWA500", "BONUS20"). Ignore links and prices.
3. If the text promotes several apps, return one entry per app.

OUTPUT RULES:
- Return ONLY valid JSON, no commentary.
- Format: [{{"appName": "Name", "codes": ["Code1", "Code2"]}}]"#
    )
}

#[derive(Debug, Deserialize)]
struct ReplyGroup {
    #[serde(default, rename = "appName", alias = "app_name", alias = "app")]
    app_name: Option<Value>,
    #[serde(default)]
    codes: Option<Value>,
}

impl ReplyGroup {
    fn into_raw_group(self) -> RawCodeGroup {
        let app_name = match self.app_name {
            Some(Value::String(name)) => Some(name),
            _ => None,
        };
        let codes = match self.codes {
            Some(Value::Array(items)) => items.into_iter().filter_map(scalar_to_string).collect(),
            Some(other) => scalar_to_string(other).into_iter().collect(),
            None => Vec::new(),
        };
        RawCodeGroup { app_name, codes }
    }
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn is_group_shaped(value: &Value) -> bool {
    match value {
        Value::Object(_) => true,
        Value::Array(items) => items.iter().any(Value::is_object),
        _ => false,
    }
}

/// Locate the first JSON object, or array holding objects, inside `reply`
///
/// Prose, markdown fences, trailing text and JSON values that cannot hold a
/// group (`[2]`, `[]`) are skipped.
pub fn find_json(reply: &str) -> Option<Value> {
    reply
        .char_indices()
        .filter(|(_, c)| *c == '{' || *c == '[')
        .find_map(|(start, _)| {
            serde_json::Deserializer::from_str(&reply[start..])
                .into_iter::<Value>()
                .next()
                .and_then(Result::ok)
                .filter(is_group_shaped)
        })
}

/// Parse the service reply into unvalidated groups
///
/// # Examples
///
/// ```rust
/// use lootscan::primary_extractor::parse_reply;
///
/// let reply = "Sure!\n```json\n{\"appName\": \"11Win\", \"codes\": [\"DIWA500\"]}\n```";
/// let groups = parse_reply(reply).unwrap();
///
/// assert_eq!(groups[0].app_name.as_deref(), Some("11Win"));
/// assert_eq!(groups[0].codes, vec!["DIWA500"]);
/// ```
pub fn parse_reply(reply: &str) -> Result<Vec<RawCodeGroup>, ScanError> {
    let value = find_json(reply)
        .ok_or_else(|| ScanError::MalformedReply("no JSON object or array found".to_string()))?;

    let groups = match value {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .map(serde_json::from_value::<ReplyGroup>)
            .collect::<Result<Vec<_>, _>>()?,
        Value::Object(_) => vec![serde_json::from_value::<ReplyGroup>(value)?],
        other => {
            return Err(ScanError::MalformedReply(format!(
                "unexpected JSON value: {other}"
            )))
        }
    };

    Ok(groups.into_iter().map(ReplyGroup::into_raw_group).collect())
}

/// Wraps a [`PrimaryExtractor`] with a timeout, a circuit breaker and reply parsing
pub struct PrimaryExtractorAdapter {
    backend: Arc<dyn PrimaryExtractor>,
    circuit_breaker: CircuitBreaker,
    timeout: Duration,
}

impl PrimaryExtractorAdapter {
    pub fn new(backend: Arc<dyn PrimaryExtractor>, recovery: RecoveryConfig) -> Self {
        Self {
            backend,
            timeout: Duration::from_secs(recovery.operation_timeout_secs),
            circuit_breaker: CircuitBreaker::new(recovery),
        }
    }

    /// Single attempt at the remote extraction, without recovery
    pub async fn try_extract(&self, raw: &str) -> Result<Vec<RawCodeGroup>, ScanError> {
        if self.circuit_breaker.is_open() {
            return Err(ScanError::CircuitOpen);
        }

        let reply = match tokio::time::timeout(self.timeout, self.backend.submit_text(raw)).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                self.circuit_breaker.record_failure();
                return Err(e);
            }
            Err(_) => {
                self.circuit_breaker.record_failure();
                return Err(ScanError::Timeout(format!(
                    "no reply after {}s",
                    self.timeout.as_secs()
                )));
            }
        };

        // The service answered; a reply we cannot read does not count against it.
        self.circuit_breaker.record_success();
        debug!(backend = self.backend.name(), reply_len = reply.len(), "Primary extractor replied");
        parse_reply(&reply)
    }

    /// Extract groups, converting every failure into an empty result
    pub async fn extract(&self, raw: &str) -> Vec<RawCodeGroup> {
        match self.try_extract(raw).await {
            Ok(groups) => {
                info!(
                    backend = self.backend.name(),
                    groups = groups.len(),
                    "Primary extraction completed"
                );
                groups
            }
            Err(ScanError::CircuitOpen) => {
                debug!(backend = self.backend.name(), "Primary extractor skipped, circuit open");
                Vec::new()
            }
            Err(e) => {
                warn!(backend = self.backend.name(), error = %e, "Primary extraction failed");
                Vec::new()
            }
        }
    }
}
