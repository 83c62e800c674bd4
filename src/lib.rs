//! # Lootscan
//!
//! A Telegram bot that reads forwarded promo messages, extracts app names and
//! promo codes from them and republishes a clean announcement.
//!
//! Extraction runs in two stages: an external text-understanding service
//! first, then a deterministic pattern scan whenever the service has nothing
//! useful. Both results go through the same sanitizer and validator.

pub mod announcement;
pub mod bot;
pub mod candidate_extractor;
pub mod circuit_breaker;
pub mod code_model;
pub mod dialogue;
pub mod gemini;
pub mod localization;
pub mod normalizer;
pub mod primary_extractor;
pub mod reconciler;
pub mod sanitizer;
pub mod scan_config;
pub mod scan_errors;
pub mod scan_patterns;
pub mod validator;
