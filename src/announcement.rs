//! Announcement formatting for Telegram HTML messages

use teloxide::utils::html::escape;

use crate::code_model::CodeGroup;

const SEPARATOR: &str = "➖➖➖➖➖➖➖➖➖➖";

/// Render one group as an HTML message block
pub fn format_group(group: &CodeGroup) -> String {
    let name = escape(group.app_name());
    let mut message = format!(
        "<b>🎊 NEW LOOT FOR {} 🎊</b>\n\n🔥 <b>App Name:</b> {}\n{}\n\n",
        escape(&group.app_name().to_uppercase()),
        name,
        SEPARATOR
    );

    for (i, code) in group.codes().iter().enumerate() {
        message.push_str(&format!(
            "🎁 <b>Code {}:</b> <code>{}</code>\n",
            i + 1,
            escape(code)
        ));
    }

    message.push_str(&format!("\n{}\n<i>⚡️ Click on any code to copy!</i>", SEPARATOR));
    message
}

/// Render one message per group; the footer goes after the last block
pub fn format_announcements(groups: &[CodeGroup], footer: Option<&str>) -> Vec<String> {
    let mut messages: Vec<String> = groups.iter().map(format_group).collect();

    if let (Some(last), Some(footer)) = (messages.last_mut(), footer) {
        let footer = footer.trim();
        if !footer.is_empty() {
            last.push_str(&format!("\n\n<b>{}</b>", escape(footer)));
        }
    }

    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(name: &str, codes: &[&str]) -> CodeGroup {
        let mut group = CodeGroup::new(name, "Exclusive Loot");
        for code in codes {
            group.insert(*code);
        }
        group
    }

    #[test]
    fn test_format_group() {
        let message = format_group(&group("11Win", &["DIWA500", "7788"]));

        assert!(message.starts_with("<b>🎊 NEW LOOT FOR 11WIN 🎊</b>"));
        assert!(message.contains("🔥 <b>App Name:</b> 11Win\n"));
        let first = message.find("<b>Code 1:</b> <code>DIWA500</code>").unwrap();
        let second = message.find("<b>Code 2:</b> <code>7788</code>").unwrap();
        assert!(first < second);
        assert!(message.ends_with("<i>⚡️ Click on any code to copy!</i>"));
    }

    #[test]
    fn test_escapes_html() {
        let message = format_group(&group("A&B <Club>", &["X&Y1"]));
        assert!(message.contains("A&amp;B &lt;Club&gt;"));
        assert!(message.contains("<code>X&amp;Y1</code>"));
    }

    #[test]
    fn test_footer_only_on_last_message() {
        let groups = vec![group("A", &["AAA1"]), group("B", &["BBB2"])];
        let messages = format_announcements(&groups, Some("Join @lootchannel"));

        assert_eq!(messages.len(), 2);
        assert!(!messages[0].contains("lootchannel"));
        assert!(messages[1].ends_with("\n\n<b>Join @lootchannel</b>"));
    }

    #[test]
    fn test_blank_footer_ignored() {
        let messages = format_announcements(&[group("A", &["AAA1"])], Some("   "));
        assert!(messages[0].ends_with("copy!</i>"));
        assert!(format_announcements(&[], Some("x")).is_empty());
    }
}
