use chrono::{DateTime, Local};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// `**x**` where `x` holds no line terminator (`\n`, `\r`, U+2028, U+2029).
pub(crate) static BOLD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*([^\n\r\x{2028}\x{2029}]*?)\*\*").expect("valid bold pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

/// A rendered transcript entry. Never persisted.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub text: String,
    pub sender: Sender,
    pub is_error: bool,
    pub time: DateTime<Local>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Sender::User, false)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, Sender::Bot, false)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, Sender::Bot, true)
    }

    fn new(text: impl Into<String>, sender: Sender, is_error: bool) -> Self {
        Self {
            text: text.into(),
            sender,
            is_error,
            time: Local::now(),
        }
    }

    /// Inner HTML of the message bubble.
    ///
    /// User text is escaped. Bot text is trusted: only newlines and `**bold**`
    /// are rewritten, any other markup passes through untouched.
    pub fn content_html(&self) -> String {
        match self.sender {
            Sender::User => escape_html(&self.text),
            Sender::Bot => format_bot_text(&self.text),
        }
    }

    pub fn time_label(&self) -> String {
        self.time.format("%H:%M").to_string()
    }
}

pub fn format_bot_text(text: &str) -> String {
    let with_breaks = text.replace('\n', "<br>");
    BOLD.replace_all(&with_breaks, "<b>$1</b>").into_owned()
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
