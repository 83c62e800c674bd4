//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::announcement::format_announcements;
use crate::dialogue::{validate_footer, FooterDialogue, FooterDialogueState};
use crate::localization::t;
use crate::reconciler::{should_skip, Reconciler, ScanOutcome};

use super::commands::{handle_command, parse_command};
use super::settings::BotSettings;

/// Store the admin's message as footer while `/end` is pending
///
/// Returns `true` when the message was consumed.
async fn handle_footer_input(
    bot: &Bot,
    msg: &Message,
    dialogue: &FooterDialogue,
    settings: &Mutex<BotSettings>,
) -> Result<bool> {
    let Some(text) = msg.text() else {
        return Ok(false);
    };
    if parse_command(text).is_some() {
        // Another command cancels the pending footer
        dialogue.exit().await?;
        return Ok(false);
    }

    match validate_footer(text) {
        Ok(footer) => {
            info!(chat_id = %msg.chat.id, footer_length = footer.len(), "Footer saved");
            settings.lock().await.footer = Some(footer);
            dialogue.exit().await?;
            bot.send_message(msg.chat.id, t("footer-saved")).await?;
        }
        Err(reason) => {
            debug!(chat_id = %msg.chat.id, reason, "Footer rejected");
            bot.send_message(msg.chat.id, t("footer-empty")).await?;
        }
    }
    Ok(true)
}

/// Scan the text and publish the result
async fn scan_and_reply(
    bot: &Bot,
    msg: &Message,
    text: &str,
    settings: &Mutex<BotSettings>,
    reconciler: &Reconciler,
) -> Result<()> {
    let processing = bot
        .send_message(msg.chat.id, t("scanning"))
        .parse_mode(ParseMode::Html)
        .await?;

    let outcome = reconciler.scan(text).await;

    if let Err(e) = bot.delete_message(msg.chat.id, processing.id).await {
        debug!(chat_id = %msg.chat.id, error = %e, "Could not delete progress message");
    }

    match outcome {
        ScanOutcome::Found { groups, source } => {
            let footer = settings.lock().await.footer.clone();
            let codes: usize = groups.iter().map(|g| g.len()).sum();
            info!(
                chat_id = %msg.chat.id,
                groups = groups.len(),
                codes,
                ?source,
                "Publishing announcement"
            );
            for message in format_announcements(&groups, footer.as_deref()) {
                bot.send_message(msg.chat.id, message)
                    .parse_mode(ParseMode::Html)
                    .await?;
            }
        }
        ScanOutcome::NoCodes => {
            info!(chat_id = %msg.chat.id, "No codes found in message");
            bot.send_message(msg.chat.id, t("no-codes-found"))
                .parse_mode(ParseMode::Html)
                .await?;
        }
        ScanOutcome::Skipped => {}
    }
    Ok(())
}

async fn handle_message(
    bot: &Bot,
    msg: &Message,
    dialogue: FooterDialogue,
    settings: &Mutex<BotSettings>,
    reconciler: &Reconciler,
) -> Result<()> {
    let user_id = msg.from.as_ref().map(|user| user.id);
    let is_admin = settings.lock().await.is_admin(user_id);

    if is_admin
        && dialogue.get().await? == Some(FooterDialogueState::AwaitingFooter)
        && handle_footer_input(bot, msg, &dialogue, settings).await?
    {
        return Ok(());
    }

    let Some(text) = msg.text().or_else(|| msg.caption()) else {
        debug!(chat_id = %msg.chat.id, "Ignoring message without text");
        return Ok(());
    };

    if let Some(command) = parse_command(text) {
        return handle_command(bot, msg, command, dialogue, settings).await;
    }

    if !settings.lock().await.may_scan(user_id) {
        warn!(chat_id = %msg.chat.id, "Access denied for non-admin user");
        bot.send_message(msg.chat.id, t("access-denied")).await?;
        return Ok(());
    }

    if should_skip(text) {
        debug!(chat_id = %msg.chat.id, "Ignoring empty or command text");
        return Ok(());
    }

    debug!(chat_id = %msg.chat.id, message_length = text.len(), "Received promo text");
    scan_and_reply(bot, msg, text, settings, reconciler).await
}

/// Dispatcher endpoint; errors are reported to the chat instead of bubbling up
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    dialogue: FooterDialogue,
    settings: Arc<Mutex<BotSettings>>,
    reconciler: Arc<Reconciler>,
) -> Result<()> {
    if let Err(e) = handle_message(&bot, &msg, dialogue, &settings, &reconciler).await {
        error!(chat_id = %msg.chat.id, error = %e, "Message handling failed");
        if let Err(send_err) = bot.send_message(msg.chat.id, t("critical-error")).await {
            error!(chat_id = %msg.chat.id, error = %send_err, "Failed to report error to user");
        }
    }
    Ok(())
}
