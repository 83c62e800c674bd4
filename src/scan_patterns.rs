//! # Scan Patterns Module
//!
//! This module builds the regex patterns used for candidate detection and
//! sanitization from the configured vocabularies.

use lazy_static::lazy_static;
use regex::Regex;

use crate::scan_config::ScanConfig;

/// Compiled patterns derived from a [`ScanConfig`]
#[derive(Debug, Clone)]
pub struct ScanPatterns {
    /// `<label><separator><token>`, token in capture group 1
    pub keyword: Regex,
    /// `?code=VALUE` style query parameters, value in capture group 1
    pub url_param: Regex,
    /// Whole-word alphanumeric token within the standalone length range
    pub standalone: Regex,
    /// Bare ASCII digit runs within the numeric length range
    pub numeric: Regex,
    /// Known domain suffixes such as `.com`
    pub domain_suffix: Regex,
}

fn alternation(words: &[String]) -> String {
    words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}

impl ScanPatterns {
    /// Compile all patterns for the given configuration
    pub fn from_config(config: &ScanConfig) -> Result<Self, regex::Error> {
        // Chained labels such as `Promo-Code:` are consumed as one label.
        let labels = alternation(&config.keywords);
        let keyword = Regex::new(&format!(
            r"(?i)(?:(?:{labels})s?[\s\-]*)*(?:{labels})s?\s*[:\-=>»]+\s*([A-Za-z0-9@#&]+)"
        ))?;
        let url_param = Regex::new(&format!(
            r"(?i)[?&](?:{})=([A-Za-z0-9]+)",
            alternation(&config.url_params)
        ))?;
        let standalone = Regex::new(&format!(
            r"^[A-Za-z0-9]{{{},{}}}$",
            config.standalone_len.start(),
            config.standalone_len.end()
        ))?;
        let numeric = Regex::new(&format!(
            r"(?-u:\b)[0-9]{{{},{}}}(?-u:\b)",
            config.numeric_len.start(),
            config.numeric_len.end()
        ))?;
        let domain_suffix = Regex::new(&format!(
            r"(?i)\.(?:{})\b",
            alternation(&config.domain_suffixes)
        ))?;

        Ok(Self {
            keyword,
            url_param,
            standalone,
            numeric,
            domain_suffix,
        })
    }
}

lazy_static! {
    /// Patterns for the default configuration
    pub static ref DEFAULT_PATTERNS: ScanPatterns = ScanPatterns::from_config(&ScanConfig::default())
        .expect("Default scan patterns should be valid");

    /// Leading URL scheme and `www.` host prefix, possibly repeated
    pub static ref URL_PREFIX_REGEX: Regex =
        Regex::new(r"(?i)^(?:https?://|www\.)+").expect("URL prefix pattern should be valid");

    /// Ten digit unix timestamps starting with `16` or `17` (late 2020 to early 2027)
    pub static ref TIMESTAMP_REGEX: Regex =
        Regex::new(r"^1[67][0-9]{8}$").expect("Timestamp pattern should be valid");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_pattern_captures_token() {
        let caps = DEFAULT_PATTERNS.keyword.captures("Gift >> 7788").unwrap();
        assert_eq!(&caps[1], "7788");

        let caps = DEFAULT_PATTERNS.keyword.captures("redeem » Ab#12").unwrap();
        assert_eq!(&caps[1], "Ab#12");

        let caps = DEFAULT_PATTERNS.keyword.captures("Promo Codes: WIN50").unwrap();
        assert_eq!(&caps[1], "WIN50");
    }

    #[test]
    fn test_keyword_requires_separator() {
        assert!(!DEFAULT_PATTERNS.keyword.is_match("Gift 5858"));
        assert!(!DEFAULT_PATTERNS.keyword.is_match("11Win Loot\nfresh drop"));
    }

    #[test]
    fn test_url_param_pattern() {
        let caps = DEFAULT_PATTERNS
            .url_param
            .captures("https://x.in/reg?lang=en&invite=QW12er")
            .unwrap();
        assert_eq!(&caps[1], "QW12er");
        assert!(DEFAULT_PATTERNS.url_param.is_match("https://x.in/?BONUS_CODE=abc1"));
    }

    #[test]
    fn test_numeric_pattern_respects_word_boundaries() {
        let found: Vec<&str> = DEFAULT_PATTERNS
            .numeric
            .find_iter("pin 583921, call 1700000000, 123")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(found, vec!["583921"]);
    }

    #[test]
    fn test_numeric_pattern_ignores_non_ascii_digits() {
        assert!(!DEFAULT_PATTERNS.numeric.is_match("Hurry up ५८३९२१ limited"));
        assert!(!DEFAULT_PATTERNS.numeric.is_match("٥٨٣٩٢١"));
        assert!(DEFAULT_PATTERNS.numeric.is_match("pin ५ 583921"));
    }

    #[test]
    fn test_keyword_pattern_chained_labels() {
        for (text, token) in [
            ("Promo-Code: WIN50X", "WIN50X"),
            ("Gift-Code: GC77ab", "GC77ab"),
            ("Redeem-Code: RD1234", "RD1234"),
            ("Promo Code Gift - Q1W2", "Q1W2"),
        ] {
            let caps = DEFAULT_PATTERNS.keyword.captures(text).unwrap();
            assert_eq!(&caps[1], token, "{text}");
        }
    }

    #[test]
    fn test_timestamp_pattern() {
        assert!(TIMESTAMP_REGEX.is_match("1700000000"));
        assert!(TIMESTAMP_REGEX.is_match("1699999999"));
        assert!(!TIMESTAMP_REGEX.is_match("1800000000"));
        assert!(!TIMESTAMP_REGEX.is_match("170000000"));
        assert!(!TIMESTAMP_REGEX.is_match("१७००००००००"));
    }
}
