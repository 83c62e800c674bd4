//! Command parsing and the admin commands

use anyhow::Result;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tokio::sync::Mutex;
use tracing::info;

use crate::dialogue::{FooterDialogue, FooterDialogueState};
use crate::localization::t;

use super::settings::BotSettings;

/// Commands understood by the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    /// `/end`: wait for the next message and store it as footer
    SetFooter,
    /// `/clear_end`
    ClearFooter,
    Public,
    Private,
}

impl Command {
    pub fn requires_admin(&self) -> bool {
        !matches!(self, Command::Start)
    }
}

/// Parse a known command from message text
///
/// `/cmd@botname` suffixes and trailing arguments are ignored.
pub fn parse_command(text: &str) -> Option<Command> {
    let first = text.split_whitespace().next()?;
    let name = first.strip_prefix('/')?;
    let name = name.split('@').next().unwrap_or(name);
    match name.to_ascii_lowercase().as_str() {
        "start" => Some(Command::Start),
        "end" => Some(Command::SetFooter),
        "clear_end" => Some(Command::ClearFooter),
        "public" => Some(Command::Public),
        "private" => Some(Command::Private),
        _ => None,
    }
}

async fn reply_html(bot: &Bot, msg: &Message, key: &str) -> Result<()> {
    bot.send_message(msg.chat.id, t(key))
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

/// Run a command; admin commands from anyone else are ignored
pub async fn handle_command(
    bot: &Bot,
    msg: &Message,
    command: Command,
    dialogue: FooterDialogue,
    settings: &Mutex<BotSettings>,
) -> Result<()> {
    let user_id = msg.from.as_ref().map(|user| user.id);
    if command.requires_admin() && !settings.lock().await.is_admin(user_id) {
        info!(chat_id = %msg.chat.id, ?command, "Ignoring admin command from non-admin");
        return Ok(());
    }

    match command {
        Command::Start => reply_html(bot, msg, "welcome").await?,
        Command::SetFooter => {
            dialogue.update(FooterDialogueState::AwaitingFooter).await?;
            reply_html(bot, msg, "footer-prompt").await?;
        }
        Command::ClearFooter => {
            settings.lock().await.footer = None;
            dialogue.exit().await?;
            info!(chat_id = %msg.chat.id, "Footer removed");
            reply_html(bot, msg, "footer-removed").await?;
        }
        Command::Public => {
            settings.lock().await.admin_only = false;
            info!("Bot switched to public mode");
            reply_html(bot, msg, "mode-public").await?;
        }
        Command::Private => {
            settings.lock().await.admin_only = true;
            info!("Bot switched to private mode");
            reply_html(bot, msg, "mode-private").await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("/start"), Some(Command::Start));
        assert_eq!(parse_command("/end"), Some(Command::SetFooter));
        assert_eq!(parse_command("/clear_end@LootScanBot"), Some(Command::ClearFooter));
        assert_eq!(parse_command("  /PUBLIC now"), Some(Command::Public));
        assert_eq!(parse_command("/private"), Some(Command::Private));
        assert_eq!(parse_command("/unknown"), None);
        assert_eq!(parse_command("Code: /start"), None);
        assert_eq!(parse_command(""), None);
    }

    #[test]
    fn test_requires_admin() {
        assert!(!Command::Start.requires_admin());
        assert!(Command::SetFooter.requires_admin());
        assert!(Command::Public.requires_admin());
    }
}
