//! Bot configuration read from the environment, plus the runtime settings the
//! admin can change with commands.

use anyhow::{Context, Result};
use std::env;
use teloxide::types::UserId;

use crate::gemini::DEFAULT_GEMINI_MODEL;

/// Startup configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub telegram_token: String,
    /// Only this user may run admin commands; `None` means nobody can
    pub admin_id: Option<UserId>,
    /// Primary extractor is disabled without a key
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    /// Overrides the default primary extractor timeout
    pub primary_timeout_secs: Option<u64>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl BotConfig {
    /// Read the configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let telegram_token =
            non_empty(lookup("TELEGRAM_BOT_TOKEN")).context("TELEGRAM_BOT_TOKEN must be set")?;

        let admin_id = non_empty(lookup("ADMIN_ID"))
            .map(|id| id.parse::<u64>().map(UserId))
            .transpose()
            .context("ADMIN_ID must be a numeric Telegram user id")?;

        let primary_timeout_secs = non_empty(lookup("PRIMARY_TIMEOUT_SECS"))
            .map(|secs| secs.parse::<u64>())
            .transpose()
            .context("PRIMARY_TIMEOUT_SECS must be a number of seconds")?;

        Ok(Self {
            telegram_token,
            admin_id,
            gemini_api_key: non_empty(lookup("GEMINI_API_KEY")),
            gemini_model: non_empty(lookup("GEMINI_MODEL"))
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            primary_timeout_secs,
        })
    }
}

/// Settings shared by all handlers for the lifetime of the process
#[derive(Debug, Clone)]
pub struct BotSettings {
    pub admin_id: Option<UserId>,
    /// Only the admin may scan messages
    pub admin_only: bool,
    /// Appended after the last announcement block
    pub footer: Option<String>,
}

impl BotSettings {
    pub fn new(admin_id: Option<UserId>) -> Self {
        Self {
            admin_id,
            admin_only: true,
            footer: None,
        }
    }

    pub fn is_admin(&self, user_id: Option<UserId>) -> bool {
        matches!((self.admin_id, user_id), (Some(admin), Some(user)) if admin == user)
    }

    pub fn may_scan(&self, user_id: Option<UserId>) -> bool {
        !self.admin_only || self.is_admin(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_from_lookup() {
        let config = BotConfig::from_lookup(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("ADMIN_ID", "8435"),
            ("GEMINI_API_KEY", "  "),
            ("PRIMARY_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.telegram_token, "123:abc");
        assert_eq!(config.admin_id, Some(UserId(8435)));
        assert_eq!(config.gemini_api_key, None);
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.primary_timeout_secs, Some(5));
    }

    #[test]
    fn test_config_errors() {
        assert!(BotConfig::from_lookup(lookup(&[])).is_err());
        assert!(BotConfig::from_lookup(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("ADMIN_ID", "me"),
        ]))
        .is_err());
    }

    #[test]
    fn test_access_rules() {
        let mut settings = BotSettings::new(Some(UserId(1)));
        assert!(settings.is_admin(Some(UserId(1))));
        assert!(!settings.is_admin(Some(UserId(2))));
        assert!(!settings.is_admin(None));
        assert!(!settings.may_scan(Some(UserId(2))));

        settings.admin_only = false;
        assert!(settings.may_scan(Some(UserId(2))));
        assert!(settings.may_scan(None));
    }

    #[test]
    fn test_no_admin_configured() {
        let settings = BotSettings::new(None);
        assert!(!settings.is_admin(Some(UserId(1))));
        assert!(!settings.may_scan(Some(UserId(1))));
    }
}
