//! # Scan Configuration Module
//!
//! This module defines the fixed vocabularies and tunables used by the
//! extraction pipeline, including recovery settings for the primary extractor.

use std::ops::RangeInclusive;

/// Placeholder used whenever no application name can be derived
pub const SENTINEL_APP_NAME: &str = "Exclusive Loot";

/// Labels that introduce a code in the keyword tier
pub const CODE_KEYWORDS: &[&str] = &[
    "code", "gift", "promo", "loot", "bonus", "pin", "pass", "redeem",
];

/// Query parameters whose value is treated as a code
pub const URL_CODE_PARAMS: &[&str] = &["code", "invite", "refer", "referral", "bonus_code"];

/// Top-level domain suffixes stripped by the sanitizer
pub const DOMAIN_SUFFIXES: &[&str] = &["com", "in", "me", "org", "net", "xyz", "online"];

/// Generic words removed from the header line before deriving the app name
pub const HEADER_NOISE_WORDS: &[&str] = &[
    "NEW", "PROMO", "LOOT", "OFFER", "CODE", "CODES", "GIFT", "BONUS", "EXCLUSIVE", "FREE",
    "TODAY", "LIVE",
];

/// Noise vocabulary rejected as codes regardless of case
pub const BLACKLIST: &[&str] = &[
    // Labels
    "CODE", "CODES", "GIFT", "GIFTCODE", "PROMO", "PROMOCODE", "LOOT", "BONUS", "PIN", "PASS",
    "REDEEM", "OFFER", "COUPON", "VOUCHER", "REWARD", "REWARDS", "CASHBACK", "DEPOSIT",
    "WITHDRAW", "REFER", "INVITE", "CLAIM", "HERE", "LINK", "CLICK", "JOIN", "NOW", "TODAY",
    "HURRY", "LIMITED", "VALID", "USERS", "ONLY", "NEW", "FREE", "EXCLUSIVE",
    // Platforms
    "APP", "GAME", "CLUB", "BET", "MALL", "WIN", "WINNER", "TELEGRAM", "CHANNEL", "WHATSAPP",
    "YOUTUBE", "INSTAGRAM", "DOWNLOAD", "REGISTER", "SIGNUP", "LOGIN", "HTTPS", "HTTP", "WWW",
    // Superlatives
    "BEST", "MEGA", "SUPER", "ULTRA", "BIGGEST", "HIGHEST", "MAXIMUM", "TOP",
];

/// Round amounts that show up as prices far more often than as codes
pub const COMMON_PRICES: &[&str] = &[
    "100", "200", "250", "300", "500", "1000", "2000", "5000", "10000",
];

/// Substrings left behind by links and mentions
pub const LINK_ARTIFACTS: &[&str] = &["http", "www", "&t=", "&dl=", "%", "@", "//"];

/// Recovery configuration for the primary extractor call
#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    /// Timeout for a single primary extractor call in seconds
    pub operation_timeout_secs: u64,
    /// Consecutive failures before the remote call is skipped
    pub circuit_breaker_threshold: u32,
    /// Time before a skipped remote call is attempted again, in seconds
    pub circuit_breaker_reset_secs: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            operation_timeout_secs: 20,
            circuit_breaker_threshold: 5,
            circuit_breaker_reset_secs: 60, // 1 minute
        }
    }
}

/// Configuration structure for the extraction pipeline
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Fallback application name
    pub sentinel_app_name: String,
    /// Number of header tokens joined into the app name
    pub app_name_tokens: usize,
    /// Accepted length of a standalone token
    pub standalone_len: RangeInclusive<usize>,
    /// Accepted digit count of a numeric fallback candidate
    pub numeric_len: RangeInclusive<usize>,
    /// Accepted length of a validated code, in characters
    pub code_len: RangeInclusive<usize>,
    pub keywords: Vec<String>,
    pub url_params: Vec<String>,
    pub domain_suffixes: Vec<String>,
    pub header_noise: Vec<String>,
    pub blacklist: Vec<String>,
    pub common_prices: Vec<String>,
    pub link_artifacts: Vec<String>,
    /// Recovery and error handling configuration
    pub recovery: RecoveryConfig,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            sentinel_app_name: SENTINEL_APP_NAME.to_string(),
            app_name_tokens: 2,
            standalone_len: 5..=25,
            numeric_len: 4..=8,
            code_len: 3..=40,
            keywords: owned(CODE_KEYWORDS),
            url_params: owned(URL_CODE_PARAMS),
            domain_suffixes: owned(DOMAIN_SUFFIXES),
            header_noise: owned(HEADER_NOISE_WORDS),
            blacklist: owned(BLACKLIST),
            common_prices: owned(COMMON_PRICES),
            link_artifacts: owned(LINK_ARTIFACTS),
            recovery: RecoveryConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blacklist_is_uppercase() {
        for word in BLACKLIST {
            assert_eq!(*word, word.to_uppercase(), "blacklist entry not uppercase: {word}");
        }
    }

    #[test]
    fn test_default_ranges() {
        let config = ScanConfig::default();
        assert_eq!(config.app_name_tokens, 2);
        assert!(config.standalone_len.contains(&5));
        assert!(!config.standalone_len.contains(&4));
        assert!(config.numeric_len.contains(&8));
        assert!(!config.code_len.contains(&41));
    }
}
