//! # Candidate Extractor Module
//!
//! Deterministic fallback extractor. It derives an app name from the header
//! line and scans the normalized text with an ordered chain of tiers:
//!
//! 1. keyword labels (`Code: ABC`, `Gift >> 1234`)
//! 2. URL query parameters (`?code=ABC`, `&invite=ABC`)
//! 3. standalone mixed letter/digit tokens (`DIWA500`)
//! 4. bare 4-8 digit numbers
//!
//! The first tier producing anything wins; lower tiers are not merged in.

use regex::Regex;
use tracing::{debug, info, trace};

use crate::code_model::{dedupe_preserving_order, CandidateTier, CodeCandidate, RawCodeGroup};
use crate::normalizer::{header_words, normalize};
use crate::scan_config::ScanConfig;
use crate::scan_patterns::{ScanPatterns, DEFAULT_PATTERNS};

/// What a tier gets to look at
#[derive(Debug)]
pub struct TierInput<'a> {
    /// Normalized message text
    pub text: &'a str,
    /// Words making up the derived app name
    pub app_name_words: &'a [String],
}

/// One heuristic in the fallback chain
pub trait TierStrategy: Send + Sync {
    fn tier(&self) -> CandidateTier;

    /// Return raw candidate values in order of appearance
    fn collect(&self, input: &TierInput<'_>) -> Vec<String>;
}

/// Check whether a whitespace-delimited word is part of a link
fn is_link_fragment(word: &str, domain_suffix: &Regex) -> bool {
    let lower = word.to_ascii_lowercase();
    lower.contains("http")
        || lower.contains("www")
        || lower.contains("://")
        || domain_suffix.is_match(&lower)
}

/// The whitespace-delimited word of `text` containing byte offset `pos`
fn word_at(text: &str, pos: usize) -> &str {
    let start = text[..pos]
        .rfind(char::is_whitespace)
        .map(|i| i + text[i..].chars().next().map_or(1, char::len_utf8))
        .unwrap_or(0);
    let end = text[pos..]
        .find(char::is_whitespace)
        .map(|i| pos + i)
        .unwrap_or(text.len());
    &text[start..end]
}

/// `<label><separator><token>` matches
///
/// Tokens sitting inside a link and tokens that are labels themselves are
/// skipped, so they never block the lower tiers.
pub struct KeywordTier {
    pattern: Regex,
    domain_suffix: Regex,
    labels: Vec<String>,
}

impl TierStrategy for KeywordTier {
    fn tier(&self) -> CandidateTier {
        CandidateTier::Keyword
    }

    fn collect(&self, input: &TierInput<'_>) -> Vec<String> {
        self.pattern
            .captures_iter(input.text)
            .filter_map(|caps| caps.get(1))
            .filter(|token| {
                !is_link_fragment(word_at(input.text, token.start()), &self.domain_suffix)
            })
            .map(|token| token.as_str())
            .filter(|token| token.len() > 2 && !token.to_ascii_lowercase().starts_with("http"))
            .filter(|token| !self.labels.iter().any(|label| label.eq_ignore_ascii_case(token)))
            .map(str::to_string)
            .collect()
    }
}

/// Query parameter values such as `&invite=QW12er`
pub struct UrlParameterTier {
    pattern: Regex,
}

impl TierStrategy for UrlParameterTier {
    fn tier(&self) -> CandidateTier {
        CandidateTier::UrlParameter
    }

    fn collect(&self, input: &TierInput<'_>) -> Vec<String> {
        self.pattern
            .captures_iter(input.text)
            .filter_map(|caps| caps.get(1))
            .map(|value| value.as_str().to_string())
            .collect()
    }
}

/// Words that look like codes on their own
///
/// A word qualifies when it is alphanumeric, within the configured length and
/// mixes letters with digits. Link fragments, purely numeric words and words
/// of the app name never qualify.
pub struct StandaloneTokenTier {
    pattern: Regex,
    domain_suffix: Regex,
}

impl TierStrategy for StandaloneTokenTier {
    fn tier(&self) -> CandidateTier {
        CandidateTier::StandaloneToken
    }

    fn collect(&self, input: &TierInput<'_>) -> Vec<String> {
        input
            .text
            .split_whitespace()
            .filter(|word| !is_link_fragment(word, &self.domain_suffix))
            .map(|word| word.trim_matches(|c: char| !c.is_ascii_alphanumeric()))
            .filter(|word| self.pattern.is_match(word))
            .filter(|word| {
                word.chars().any(|c| c.is_ascii_alphabetic())
                    && word.chars().any(|c| c.is_ascii_digit())
            })
            .filter(|word| {
                !input
                    .app_name_words
                    .iter()
                    .any(|name| name.eq_ignore_ascii_case(word))
            })
            .map(str::to_string)
            .collect()
    }
}

/// Bare digit runs, the last resort
pub struct NumericFallbackTier {
    pattern: Regex,
}

impl TierStrategy for NumericFallbackTier {
    fn tier(&self) -> CandidateTier {
        CandidateTier::NumericFallback
    }

    fn collect(&self, input: &TierInput<'_>) -> Vec<String> {
        self.pattern
            .find_iter(input.text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Result of a deterministic scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateScan {
    pub app_name: String,
    /// Unique candidates, all produced by the same tier
    pub candidates: Vec<CodeCandidate>,
}

impl CandidateScan {
    /// The tier that produced the candidates, if any
    pub fn tier(&self) -> Option<CandidateTier> {
        self.candidates.first().map(|c| c.tier)
    }

    pub fn into_raw_group(self) -> RawCodeGroup {
        RawCodeGroup {
            app_name: Some(self.app_name),
            codes: self.candidates.into_iter().map(|c| c.value).collect(),
        }
    }
}

/// Rule-based extractor working without any external dependency
pub struct CandidateExtractor {
    tiers: Vec<Box<dyn TierStrategy>>,
    config: ScanConfig,
}

impl CandidateExtractor {
    /// Create an extractor with the default vocabularies and tier chain
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lootscan::candidate_extractor::CandidateExtractor;
    ///
    /// let extractor = CandidateExtractor::new();
    /// let scan = extractor.scan("11Win Loot\nCode: DIWA500\nGift >> 7788");
    ///
    /// assert_eq!(scan.app_name, "11Win");
    /// assert_eq!(scan.candidates.len(), 2);
    /// ```
    pub fn new() -> Self {
        Self::from_patterns(DEFAULT_PATTERNS.clone(), ScanConfig::default())
    }

    /// Create an extractor with custom vocabularies or length ranges
    pub fn with_config(config: ScanConfig) -> Result<Self, regex::Error> {
        let patterns = ScanPatterns::from_config(&config)?;
        info!(
            keywords = config.keywords.len(),
            app_name_tokens = config.app_name_tokens,
            "Creating CandidateExtractor with custom config"
        );
        Ok(Self::from_patterns(patterns, config))
    }

    fn from_patterns(patterns: ScanPatterns, config: ScanConfig) -> Self {
        let tiers: Vec<Box<dyn TierStrategy>> = vec![
            Box::new(KeywordTier {
                pattern: patterns.keyword,
                domain_suffix: patterns.domain_suffix.clone(),
                labels: config.keywords.clone(),
            }),
            Box::new(UrlParameterTier {
                pattern: patterns.url_param,
            }),
            Box::new(StandaloneTokenTier {
                pattern: patterns.standalone,
                domain_suffix: patterns.domain_suffix,
            }),
            Box::new(NumericFallbackTier {
                pattern: patterns.numeric,
            }),
        ];
        Self { tiers, config }
    }

    /// Derive the app name from the first line left after normalization
    ///
    /// Returns the sentinel name when the header is empty after cleaning.
    pub fn derive_app_name(&self, text: &str) -> String {
        self.join_app_name(&self.app_name_words(&normalize(text)))
    }

    fn join_app_name(&self, words: &[String]) -> String {
        if words.is_empty() {
            self.config.sentinel_app_name.clone()
        } else {
            words.join(" ")
        }
    }

    fn app_name_words(&self, text: &str) -> Vec<String> {
        header_words(text, &self.config.header_noise)
            .into_iter()
            .take(self.config.app_name_tokens)
            .collect()
    }

    /// Run the tier chain over the message
    pub fn scan(&self, raw_text: &str) -> CandidateScan {
        let text = normalize(raw_text);
        let app_name_words = self.app_name_words(&text);
        let app_name = self.join_app_name(&app_name_words);

        let input = TierInput {
            text: &text,
            app_name_words: &app_name_words,
        };

        for strategy in &self.tiers {
            let values = dedupe_preserving_order(strategy.collect(&input));
            trace!(tier = %strategy.tier(), found = values.len(), "Tier scanned");
            if values.is_empty() {
                continue;
            }

            debug!(
                tier = %strategy.tier(),
                candidates = values.len(),
                app_name = %app_name,
                "Fallback extraction found candidates"
            );
            let candidates = values
                .into_iter()
                .map(|value| CodeCandidate {
                    value,
                    tier: strategy.tier(),
                })
                .collect();
            return CandidateScan {
                app_name,
                candidates,
            };
        }

        debug!(app_name = %app_name, "Fallback extraction found no candidates");
        CandidateScan {
            app_name,
            candidates: Vec::new(),
        }
    }

    /// Scan and return the single group this extractor always produces
    pub fn extract(&self, raw_text: &str) -> Vec<RawCodeGroup> {
        vec![self.scan(raw_text).into_raw_group()]
    }
}

impl Default for CandidateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(scan: &CandidateScan) -> Vec<&str> {
        scan.candidates.iter().map(|c| c.value.as_str()).collect()
    }

    #[test]
    fn test_keyword_tier_wins() {
        let extractor = CandidateExtractor::new();
        let scan = extractor.scan("11Win Loot\nCode: DIWA500\nGift >> 7788\nAlso try BONUS20");

        assert_eq!(scan.app_name, "11Win");
        assert_eq!(values(&scan), vec!["DIWA500", "7788"]);
        assert_eq!(scan.tier(), Some(CandidateTier::Keyword));
    }

    #[test]
    fn test_keyword_rejects_links_and_short_tokens() {
        let extractor = CandidateExtractor::new();
        let scan = extractor.scan("Bet Club\nCode: https://bet.club/x\nPin: ab\nPass - Q1W2");

        assert_eq!(values(&scan), vec!["Q1W2"]);
    }

    #[test]
    fn test_chained_labels_keep_the_code() {
        let extractor = CandidateExtractor::new();
        for (text, code) in [
            ("Tiranga Games\nPromo-Code: WIN50X", "WIN50X"),
            ("Tiranga Games\nGift-Code: GC77ab", "GC77ab"),
            ("Tiranga Games\nRedeem-Code: RD1234", "RD1234"),
        ] {
            let scan = extractor.scan(text);
            assert_eq!(values(&scan), vec![code], "{text}");
            assert_eq!(scan.tier(), Some(CandidateTier::Keyword));
        }
    }

    #[test]
    fn test_label_token_does_not_block_lower_tiers() {
        let extractor = CandidateExtractor::new();
        let scan = extractor.scan("Bet Club\nGift: Bonus\nUse XY77zz");

        assert_eq!(values(&scan), vec!["XY77zz"]);
        assert_eq!(scan.tier(), Some(CandidateTier::StandaloneToken));
    }

    #[test]
    fn test_keyword_inside_link_is_ignored() {
        let extractor = CandidateExtractor::new();
        let scan = extractor.scan("Raja Games\nRegister https://raja.games/gift-page?invite=RJ77aa");

        assert_eq!(values(&scan), vec!["RJ77aa"]);
        assert_eq!(scan.tier(), Some(CandidateTier::UrlParameter));

        let scan = extractor.scan("Raja Games\nraja.in/promo-page then Code: RJ5566");
        assert_eq!(values(&scan), vec!["RJ5566"]);

        let scan = extractor.scan("Raja Games\nhttps://raja.in/gift Code: RJ7788");
        assert_eq!(values(&scan), vec!["RJ7788"]);
    }

    #[test]
    fn test_word_at() {
        let text = "Use ünï code:X1 now";
        assert_eq!(word_at(text, 0), "Use");
        assert_eq!(word_at(text, 4), "ünï");
        assert_eq!(word_at(text, 11), "code:X1");
        assert_eq!(word_at(text, text.len() - 1), "now");
    }

    #[test]
    fn test_url_parameter_tier() {
        let extractor = CandidateExtractor::new();
        let scan = extractor.scan("Raja Games\nJoin https://raja.games/reg?invite=RJ77aa now");

        assert_eq!(values(&scan), vec!["RJ77aa"]);
        assert_eq!(scan.tier(), Some(CandidateTier::UrlParameter));
    }

    #[test]
    fn test_standalone_tier_skips_app_name_and_links() {
        let extractor = CandidateExtractor::new();
        let scan = extractor.scan("Diwa777 drop\nUse DIWA500 or (BONUS20) at diwa777.com today, 2500 left");

        assert_eq!(scan.app_name, "Diwa777 drop");
        assert_eq!(values(&scan), vec!["DIWA500", "BONUS20"]);
        assert_eq!(scan.tier(), Some(CandidateTier::StandaloneToken));
    }

    #[test]
    fn test_numeric_fallback_tier() {
        let extractor = CandidateExtractor::new();
        let scan = extractor.scan("Hurry up 583921 limited");

        assert_eq!(values(&scan), vec!["583921"]);
        assert_eq!(scan.tier(), Some(CandidateTier::NumericFallback));
    }

    #[test]
    fn test_no_candidates() {
        let extractor = CandidateExtractor::new();
        let scan = extractor.scan("Check out our website for updates!");

        assert!(scan.candidates.is_empty());
        assert_eq!(scan.tier(), None);
        assert_eq!(scan.app_name, "Check out");
    }

    #[test]
    fn test_duplicates_removed_case_sensitively() {
        let extractor = CandidateExtractor::new();
        let scan = extractor.scan("x\nCode: ABC1\nGift: abc1\nPromo: ABC1");

        assert_eq!(values(&scan), vec!["ABC1", "abc1"]);
    }

    #[test]
    fn test_sentinel_app_name() {
        let extractor = CandidateExtractor::new();
        assert_eq!(extractor.derive_app_name("🎊 NEW LOOT 🎊\nCode: X1"), "Exclusive Loot");
        assert_eq!(extractor.derive_app_name(""), "Exclusive Loot");
    }

    #[test]
    fn test_derive_app_name_matches_scan() {
        let extractor = CandidateExtractor::new();
        let text = "🎁🎁\n11Win Loot\nCode: DIWA500";

        assert_eq!(extractor.derive_app_name(text), "11Win");
        assert_eq!(extractor.scan(text).app_name, extractor.derive_app_name(text));
    }

    #[test]
    fn test_extract_returns_single_group() {
        let extractor = CandidateExtractor::new();
        let groups = extractor.extract("nothing to see");
        assert_eq!(groups.len(), 1);
        assert!(!groups[0].has_codes());
    }

    #[test]
    fn test_custom_token_count() {
        let config = ScanConfig {
            app_name_tokens: 1,
            ..Default::default()
        };
        let extractor = CandidateExtractor::with_config(config).unwrap();
        assert_eq!(extractor.derive_app_name("Tiranga Games Official"), "Tiranga");
    }
}
