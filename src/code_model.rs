//! # Code Model Module
//!
//! Core data types flowing through the extraction pipeline: raw candidates,
//! unvalidated groups coming out of either extractor, and the validated
//! [`CodeGroup`] handed to the presentation layer.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Heuristic tier that proposed a candidate, in descending confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandidateTier {
    /// `Code: ABC` style label followed by a separator
    Keyword,
    /// `?code=ABC` style query parameter
    UrlParameter,
    /// Mixed letter/digit word standing on its own
    StandaloneToken,
    /// Bare 4-8 digit run
    NumericFallback,
}

impl CandidateTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateTier::Keyword => "keyword",
            CandidateTier::UrlParameter => "url-parameter",
            CandidateTier::StandaloneToken => "standalone-token",
            CandidateTier::NumericFallback => "numeric-fallback",
        }
    }
}

impl fmt::Display for CandidateTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A substring of the message proposed as a code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeCandidate {
    pub value: String,
    pub tier: CandidateTier,
}

/// An app-name/codes record before sanitization and validation
///
/// Both extractors produce these; nothing in here is trusted yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCodeGroup {
    pub app_name: Option<String>,
    pub codes: Vec<String>,
}

impl RawCodeGroup {
    pub fn has_codes(&self) -> bool {
        self.codes.iter().any(|code| !code.trim().is_empty())
    }
}

/// One detected promotion: an app name and its unique codes in first-seen order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeGroup {
    app_name: String,
    codes: Vec<String>,
}

impl CodeGroup {
    /// Create an empty group; an empty name is replaced by `fallback_name`
    pub fn new(app_name: &str, fallback_name: &str) -> Self {
        let app_name = app_name.trim();
        let app_name = if app_name.is_empty() {
            fallback_name.to_string()
        } else {
            app_name.to_string()
        };
        Self {
            app_name,
            codes: Vec::new(),
        }
    }

    /// Add a code unless it is empty or already present (case-sensitive)
    ///
    /// Returns `true` when the code was added.
    pub fn insert(&mut self, code: impl Into<String>) -> bool {
        let code = code.into();
        if code.is_empty() || self.codes.contains(&code) {
            return false;
        }
        self.codes.push(code);
        true
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }
}

/// Remove exact duplicates while keeping the first occurrence of each value
pub fn dedupe_preserving_order<I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
