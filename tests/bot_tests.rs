//! # Bot Tests
//!
//! Presentation-side behavior that does not need a live Telegram connection:
//! reply texts, command parsing, footer handling and announcement rendering of
//! real scan results.

use lootscan::announcement::format_announcements;
use lootscan::bot::commands::{parse_command, Command};
use lootscan::bot::BotSettings;
use lootscan::dialogue::validate_footer;
use lootscan::localization::{init_localization, t, LocalizationManager};
use lootscan::reconciler::Reconciler;
use teloxide::types::UserId;

fn setup_localization() {
    // Initialize localization if not already done
    let _ = init_localization();
}

#[test]
fn test_every_reply_key_is_translated() {
    let manager = LocalizationManager::new().expect("Failed to create localization manager");
    for key in [
        "welcome",
        "access-denied",
        "scanning",
        "no-codes-found",
        "critical-error",
        "footer-prompt",
        "footer-saved",
        "footer-removed",
        "footer-empty",
        "mode-public",
        "mode-private",
    ] {
        let message = manager.get_message(key);
        assert!(!message.starts_with("Missing"), "no translation for {key}");
    }
}

#[test]
fn test_multiline_messages() {
    setup_localization();
    assert_eq!(
        t("no-codes-found"),
        "❌ <b>No Codes Found.</b>\nI scanned the whole text but couldn't find a valid code pattern."
    );
    assert_eq!(t("footer-prompt"), "📝 <b>Set Footer Text</b>\nSend the text now.");
}

#[test]
fn test_unknown_key() {
    setup_localization();
    assert_eq!(t("does-not-exist"), "Missing translation: does-not-exist");
}

#[test]
fn test_commands_and_promo_text_are_told_apart() {
    assert_eq!(parse_command("/end"), Some(Command::SetFooter));
    assert_eq!(parse_command("/clear_end"), Some(Command::ClearFooter));
    assert_eq!(parse_command("11Win Loot\nCode: DIWA500"), None);
}

#[test]
fn test_footer_flow() {
    let mut settings = BotSettings::new(Some(UserId(42)));
    assert!(validate_footer("/clear_end").is_err());
    assert!(validate_footer("   ").is_err());

    settings.footer = Some(validate_footer("  Join <Loot> & win  ").unwrap());
    assert_eq!(settings.footer.as_deref(), Some("Join <Loot> & win"));
}

#[tokio::test]
async fn test_scan_result_rendering() {
    let reconciler = Reconciler::fallback_only();
    let outcome = reconciler.scan("11Win Loot\nCode: DIWA500\nGift >> 7788").await;

    let messages = format_announcements(outcome.groups(), Some("Join <Loot> & win"));

    assert_eq!(messages.len(), 1);
    let message = &messages[0];
    assert!(message.contains("NEW LOOT FOR 11WIN"));
    assert!(message.contains("<b>Code 1:</b> <code>DIWA500</code>"));
    assert!(message.contains("<b>Code 2:</b> <code>7788</code>"));
    assert!(message.ends_with("<b>Join &lt;Loot&gt; &amp; win</b>"));
}

#[tokio::test]
async fn test_no_codes_renders_nothing() {
    let reconciler = Reconciler::fallback_only();
    let outcome = reconciler.scan("Check out our website for updates!").await;
    assert!(format_announcements(outcome.groups(), Some("footer")).is_empty());
}
