//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `message_handler`: Routes incoming messages to commands, footer input or a scan
//! - `commands`: Parses commands and runs the admin ones
//! - `settings`: Environment configuration and runtime settings

pub mod commands;
pub mod message_handler;
pub mod settings;

// Re-export main handler function for use in main.rs
pub use message_handler::message_handler;

pub use settings::{BotConfig, BotSettings};
