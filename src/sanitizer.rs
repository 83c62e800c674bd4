//! # Sanitizer Module
//!
//! Recovers the payload of a code candidate by stripping link debris: domain
//! suffixes, URL schemes and `www.` prefixes.

use regex::Regex;
use tracing::trace;

use crate::scan_config::ScanConfig;
use crate::scan_patterns::{ScanPatterns, DEFAULT_PATTERNS, URL_PREFIX_REGEX};

/// Strips incidental URL artifacts from raw code candidates
#[derive(Debug, Clone)]
pub struct Sanitizer {
    domain_suffix: Regex,
}

impl Sanitizer {
    pub fn new() -> Self {
        Self {
            domain_suffix: DEFAULT_PATTERNS.domain_suffix.clone(),
        }
    }

    pub fn with_config(config: &ScanConfig) -> Result<Self, regex::Error> {
        let patterns = ScanPatterns::from_config(config)?;
        Ok(Self {
            domain_suffix: patterns.domain_suffix,
        })
    }

    /// Clean a raw candidate
    ///
    /// The rules are re-applied until the value stops changing, so sanitizing
    /// an already clean value is a no-op.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lootscan::sanitizer::Sanitizer;
    ///
    /// let sanitizer = Sanitizer::new();
    /// assert_eq!(sanitizer.sanitize("spinwinner.com"), "spinwinner");
    /// assert_eq!(sanitizer.sanitize(" https://www.WIN50 "), "WIN50");
    /// ```
    pub fn sanitize(&self, raw: &str) -> String {
        let mut current = raw.to_string();
        loop {
            let next = self.apply_rules(&current);
            if next == current {
                if next != raw {
                    trace!(raw = %raw, sanitized = %next, "Sanitized code candidate");
                }
                return next;
            }
            current = next;
        }
    }

    // Every rule either leaves the value alone or shortens it, so the loop in
    // `sanitize` terminates.
    fn apply_rules(&self, value: &str) -> String {
        let trimmed = value.trim();
        let without_suffix = self.domain_suffix.replace_all(trimmed, "");
        URL_PREFIX_REGEX.replace(&without_suffix, "").into_owned()
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}
