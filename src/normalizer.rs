//! # Normalizer Module
//!
//! Removes decorative symbols from forwarded promo text before scanning.
//! Forwarded channel posts are heavy on emoji, flags and keycaps; none of them
//! ever belong to a code or an app name.

use tracing::trace;

/// Check whether a character is an emoji, pictograph or emoji modifier
pub fn is_pictograph(c: char) -> bool {
    matches!(
        c as u32,
        0x1F000..=0x1FAFF   // emoticons, symbols, transport, flags, supplemental
            | 0x2300..=0x23FF // misc technical (⌛ ⏳ ⏰)
            | 0x2600..=0x27BF // misc symbols and dingbats (☀ ✅ ➖)
            | 0x2B00..=0x2BFF // arrows and stars (⭐ ⬆)
            | 0xFE00..=0xFE0F // variation selectors
            | 0x200D          // zero width joiner
            | 0x20E3          // combining keycap
            | 0xE0020..=0xE007F
    )
}

/// Remove every pictographic character from the text
pub fn strip_pictographs(text: &str) -> String {
    text.chars().filter(|c| !is_pictograph(*c)).collect()
}

/// Produce the working string scanned for codes
///
/// Pictographs are removed, every line is trimmed and blank lines are dropped.
pub fn normalize(text: &str) -> String {
    let normalized = strip_pictographs(text)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<&str>>()
        .join("\n");
    trace!(before = text.len(), after = normalized.len(), "Normalized text");
    normalized
}

/// Clean the first non-blank line into the words used for app-name derivation
///
/// Anything but ASCII letters, digits and spaces is removed, and words found in
/// `noise_words` (compared case-insensitively) are dropped.
pub fn header_words(text: &str, noise_words: &[String]) -> Vec<String> {
    let Some(first_line) = text.lines().map(str::trim).find(|line| !line.is_empty()) else {
        return Vec::new();
    };

    strip_pictographs(first_line)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect::<String>()
        .split_whitespace()
        .filter(|word| {
            !noise_words
                .iter()
                .any(|noise| noise.eq_ignore_ascii_case(word))
        })
        .map(str::to_string)
        .collect()
}
