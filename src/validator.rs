//! # Validator Module
//!
//! Final gate for sanitized codes: structural bounds, noise vocabulary,
//! leftover link artifacts, timestamps and round prices.

use std::collections::HashSet;
use std::fmt;
use std::ops::RangeInclusive;

use tracing::trace;

use crate::scan_config::ScanConfig;
use crate::scan_patterns::TIMESTAMP_REGEX;

/// Why a code was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    TooShort,
    TooLong,
    Blacklisted,
    LinkArtifact,
    Timestamp,
    Price,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::TooShort => "too short",
            Rejection::TooLong => "too long",
            Rejection::Blacklisted => "generic word",
            Rejection::LinkArtifact => "link artifact",
            Rejection::Timestamp => "timestamp",
            Rejection::Price => "price",
        };
        f.write_str(reason)
    }
}

/// Accept/reject decisions for sanitized codes
#[derive(Debug, Clone)]
pub struct CodeValidator {
    code_len: RangeInclusive<usize>,
    blacklist: HashSet<String>,
    common_prices: HashSet<String>,
    link_artifacts: Vec<String>,
}

impl CodeValidator {
    pub fn new() -> Self {
        Self::with_config(&ScanConfig::default())
    }

    pub fn with_config(config: &ScanConfig) -> Self {
        Self {
            code_len: config.code_len.clone(),
            blacklist: config.blacklist.iter().map(|w| w.to_uppercase()).collect(),
            common_prices: config.common_prices.iter().cloned().collect(),
            link_artifacts: config
                .link_artifacts
                .iter()
                .map(|a| a.to_lowercase())
                .collect(),
        }
    }

    /// Check a code, reporting the first rule it breaks
    pub fn check(&self, code: &str) -> Result<(), Rejection> {
        let len = code.chars().count();
        if len < *self.code_len.start() {
            return Err(Rejection::TooShort);
        }
        if len > *self.code_len.end() {
            return Err(Rejection::TooLong);
        }
        if self.blacklist.contains(&code.to_uppercase()) {
            return Err(Rejection::Blacklisted);
        }

        let lower = code.to_lowercase();
        if self
            .link_artifacts
            .iter()
            .any(|artifact| lower.contains(artifact.as_str()))
        {
            return Err(Rejection::LinkArtifact);
        }
        if TIMESTAMP_REGEX.is_match(code) {
            return Err(Rejection::Timestamp);
        }
        if code.chars().all(|c| c.is_ascii_digit()) && self.common_prices.contains(code) {
            return Err(Rejection::Price);
        }
        Ok(())
    }

    /// Returns `true` if the code passes every rule
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lootscan::validator::CodeValidator;
    ///
    /// let validator = CodeValidator::new();
    /// assert!(validator.is_valid("DIWA500"));
    /// assert!(!validator.is_valid("code"));
    /// assert!(!validator.is_valid("1700000000"));
    /// ```
    pub fn is_valid(&self, code: &str) -> bool {
        match self.check(code) {
            Ok(()) => true,
            Err(reason) => {
                trace!(code = %code, reason = %reason, "Rejected code");
                false
            }
        }
    }
}

impl Default for CodeValidator {
    fn default() -> Self {
        Self::new()
    }
}
