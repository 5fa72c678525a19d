pub mod message;
pub mod terminal;
pub mod transcript;

pub use message::{escape_html, format_bot_text, ChatMessage, Sender};
pub use terminal::TerminalView;
pub use transcript::{Entry, Transcript};

use chrono::Utc;

/// The widget elements the conversation controller drives.
pub trait ChatView: Send {
    fn set_session_label(&mut self, label: &str);

    fn set_connection_status(&mut self, online: bool);

    fn append_message(&mut self, message: ChatMessage);

    /// Shows the loading placeholder and returns its element id.
    fn show_loading(&mut self) -> String;

    /// Removes the placeholder. Unknown ids are ignored.
    fn remove_loading(&mut self, id: &str);

    fn clear_input(&mut self);

    fn set_send_enabled(&mut self, enabled: bool);

    fn focus_input(&mut self);
}

pub fn new_loading_id() -> String {
    format!("loading-{}", Utc::now().timestamp_millis())
}

/// The first 12 characters of the session id followed by an ellipsis.
pub fn session_label(session_id: &str) -> String {
    let prefix: String = session_id.chars().take(12).collect();
    format!("{}...", prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_label_truncates() {
        assert_eq!(session_label("1718000000000-abcdefghi"), "171800000000...");
        assert_eq!(session_label("short"), "short...");
    }

    #[test]
    fn loading_ids_are_dom_addressable() {
        let id = new_loading_id();
        assert!(id.starts_with("loading-"));
        assert!(id["loading-".len()..].chars().all(|c| c.is_ascii_digit()));
    }
}
