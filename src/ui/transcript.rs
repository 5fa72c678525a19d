use crate::ui::{message::escape_html, new_loading_id, ChatMessage, ChatView, Sender};

const USER_AVATAR: &str = "user-avatar.png";
const BOT_AVATAR: &str = "chris-avatar.png";
const ERROR_STYLE: &str = "background: linear-gradient(135deg, #f87171 0%, #ef4444 100%)";
const ONLINE_COLOR: &str = "#4ade80";
const OFFLINE_COLOR: &str = "#f87171";

#[derive(Debug, Clone)]
pub enum Entry {
    Message(ChatMessage),
    Loading { id: String },
}

/// In-memory model of the chat widget: the message list plus the header and
/// form controls around it.
#[derive(Debug, Clone)]
pub struct Transcript {
    entries: Vec<Entry>,
    session_label: String,
    online: bool,
    input: String,
    send_enabled: bool,
    input_focused: bool,
}

impl Default for Transcript {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            session_label: String::new(),
            online: false,
            input: String::new(),
            send_enabled: true,
            input_focused: false,
        }
    }
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Message(m) => Some(m),
            Entry::Loading { .. } => None,
        })
    }

    pub fn has_loading(&self) -> bool {
        self.entries.iter().any(|e| matches!(e, Entry::Loading { .. }))
    }

    pub fn session_label(&self) -> &str {
        &self.session_label
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    pub fn status_text(&self) -> &'static str {
        if self.online {
            "Online"
        } else {
            "Offline"
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    pub fn is_send_enabled(&self) -> bool {
        self.send_enabled
    }

    pub fn is_input_focused(&self) -> bool {
        self.input_focused
    }

    /// Renders the message list as it would appear inside `#chat-messages`.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for entry in &self.entries {
            match entry {
                Entry::Message(m) => render_message(&mut html, m),
                Entry::Loading { id } => render_loading(&mut html, id),
            }
        }
        html
    }

    /// A standalone page with the header, status and message list.
    pub fn to_document(&self) -> String {
        let color = if self.online { ONLINE_COLOR } else { OFFLINE_COLOR };
        format!(
            "<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head><meta charset=\"utf-8\"><title>Chat</title></head>\n<body>\n\
             <header><span id=\"connection-status\" style=\"color: {color}\">{status}</span> \
             <span id=\"session-display\">{session}</span></header>\n\
             <div id=\"chat-messages\">\n{messages}</div>\n</body>\n</html>\n",
            color = color,
            status = self.status_text(),
            session = escape_html(&self.session_label),
            messages = self.to_html(),
        )
    }
}

fn avatar(sender: Sender) -> String {
    let (src, alt) = match sender {
        Sender::Bot => (BOT_AVATAR, "Bot Avatar"),
        Sender::User => (USER_AVATAR, "User Avatar"),
    };
    format!("<div class=\"message-avatar\"><img src=\"{}\" alt=\"{}\"></div>", src, alt)
}

fn render_message(html: &mut String, message: &ChatMessage) {
    let style = if message.is_error {
        format!(" style=\"{}\"", ERROR_STYLE)
    } else {
        String::new()
    };

    html.push_str(&format!(
        "<div class=\"message {sender}\">{avatar}<div><div class=\"message-content\"{style}>{content}</div>\
         <div class=\"message-time\">{time}</div></div></div>\n",
        sender = message.sender.as_str(),
        avatar = avatar(message.sender),
        style = style,
        content = message.content_html(),
        time = message.time_label(),
    ));
}

fn render_loading(html: &mut String, id: &str) {
    html.push_str(&format!(
        "<div class=\"loading-message message bot\" id=\"{id}\">{avatar}\
         <div class=\"loading-dots\"><span></span><span></span><span></span></div></div>\n",
        id = id,
        avatar = avatar(Sender::Bot),
    ));
}

impl ChatView for Transcript {
    fn set_session_label(&mut self, label: &str) {
        self.session_label = label.to_string();
    }

    fn set_connection_status(&mut self, online: bool) {
        self.online = online;
    }

    fn append_message(&mut self, message: ChatMessage) {
        self.entries.push(Entry::Message(message));
    }

    fn show_loading(&mut self) -> String {
        let id = new_loading_id();
        self.entries.push(Entry::Loading { id: id.clone() });
        id
    }

    fn remove_loading(&mut self, id: &str) {
        self.entries
            .retain(|e| !matches!(e, Entry::Loading { id: existing } if existing == id));
    }

    fn clear_input(&mut self) {
        self.input.clear();
    }

    fn set_send_enabled(&mut self, enabled: bool) {
        self.send_enabled = enabled;
    }

    fn focus_input(&mut self) {
        self.input_focused = true;
    }
}
