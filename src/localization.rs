use anyhow::Result;
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::FluentResource;
use std::sync::OnceLock;
use unic_langid::LanguageIdentifier;

const EN_MAIN: &str = include_str!("../locales/en/main.ftl");

/// Localization manager for the bot replies
pub struct LocalizationManager {
    bundle: FluentBundle<FluentResource>,
}

impl LocalizationManager {
    /// Create a new localization manager with the bundled English resource
    pub fn new() -> Result<Self> {
        let en_locale: LanguageIdentifier = "en".parse()?;
        let mut bundle = FluentBundle::new_concurrent(vec![en_locale]);
        // Replies are HTML; Unicode isolation marks would end up inside tags.
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(EN_MAIN.to_string())
            .map_err(|(_, errors)| anyhow::anyhow!("Invalid Fluent resource: {errors:?}"))?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow::anyhow!("Failed to add Fluent resource: {errors:?}"))?;

        Ok(Self { bundle })
    }

    /// Get a localized message
    pub fn get_message(&self, key: &str) -> String {
        let msg = match self.bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {}", key),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {}", key),
        };

        let mut errors = vec![];
        self.bundle
            .format_pattern(pattern, None, &mut errors)
            .into_owned()
    }
}

/// Global localization instance
static LOCALIZATION_MANAGER: OnceLock<LocalizationManager> = OnceLock::new();

/// Initialize the global localization manager
pub fn init_localization() -> Result<()> {
    if LOCALIZATION_MANAGER.get().is_none() {
        let _ = LOCALIZATION_MANAGER.set(LocalizationManager::new()?);
    }
    Ok(())
}

/// Get a localized message, or the key itself before initialization
pub fn t(key: &str) -> String {
    LOCALIZATION_MANAGER
        .get()
        .map(|manager| manager.get_message(key))
        .unwrap_or_else(|| key.to_string())
}
