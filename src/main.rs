use anyhow::Result;
use std::env;
use std::sync::Arc;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use tokio::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use lootscan::bot::{self, BotConfig, BotSettings};
use lootscan::dialogue::FooterDialogueState;
use lootscan::gemini::GeminiExtractor;
use lootscan::localization::init_localization;
use lootscan::primary_extractor::PrimaryExtractor;
use lootscan::reconciler::Reconciler;
use lootscan::scan_config::ScanConfig;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if env::var("LOG_FORMAT").is_ok_and(|format| format == "json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_tracing();

    info!("Starting Lootscan Telegram Bot");

    init_localization()?;
    let config = BotConfig::from_env()?;

    let mut scan_config = ScanConfig::default();
    if let Some(secs) = config.primary_timeout_secs {
        scan_config.recovery.operation_timeout_secs = secs;
    }

    let primary = match &config.gemini_api_key {
        Some(api_key) => {
            info!(model = %config.gemini_model, "Primary extractor enabled");
            let gemini: Arc<dyn PrimaryExtractor> =
                Arc::new(GeminiExtractor::new(api_key.clone(), config.gemini_model.clone()));
            Some(gemini)
        }
        None => {
            warn!("GEMINI_API_KEY not set, using pattern scan only");
            None
        }
    };
    let reconciler = Arc::new(Reconciler::with_config(primary, scan_config)?);

    if config.admin_id.is_none() {
        warn!("ADMIN_ID not set, admin commands are disabled and the bot stays private");
    }
    let settings = Arc::new(Mutex::new(BotSettings::new(config.admin_id)));

    let bot = Bot::new(config.telegram_token);

    info!("Bot initialized, starting dispatcher");

    let handler = Update::filter_message()
        .enter_dialogue::<Message, InMemStorage<FooterDialogueState>, FooterDialogueState>()
        .endpoint(bot::message_handler);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![
            InMemStorage::<FooterDialogueState>::new(),
            settings,
            reconciler
        ])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
