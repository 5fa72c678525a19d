use colored::Colorize;
use regex::Captures;
use std::fmt;
use std::io::{self, Write};
use tracing::warn;

use crate::ui::{message::BOLD, ChatMessage, ChatView, Sender, Transcript};

/// Prints the conversation to a terminal and mirrors it into a [`Transcript`]
/// so it can be exported as HTML afterwards.
///
/// User messages are only mirrored: the terminal already shows what was typed
/// after the prompt.
pub struct TerminalView<W: Write + Send = io::Stdout> {
    out: W,
    transcript: Transcript,
    last_status: Option<bool>,
}

impl TerminalView<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            transcript: Transcript::new(),
            last_status: None,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn prompt(&mut self) {
        self.emit(format_args!("\n{} ", "User>".bold()));
    }

    pub fn notice(&mut self, text: &str) {
        self.emit(format_args!("{}\n", text.dimmed()));
    }

    fn emit(&mut self, args: fmt::Arguments<'_>) {
        if let Err(e) = self.out.write_fmt(args).and_then(|_| self.out.flush()) {
            warn!("Failed to write to terminal: {}", e);
        }
    }
}

/// Terminal counterpart of the bot formatting: `**x**` turns bold, the text
/// is otherwise printed as is.
pub fn format_bot_terminal(text: &str) -> String {
    BOLD.replace_all(text, |caps: &Captures| caps[1].bold().to_string())
        .into_owned()
}

impl<W: Write + Send> ChatView for TerminalView<W> {
    fn set_session_label(&mut self, label: &str) {
        self.transcript.set_session_label(label);
        self.emit(format_args!("{} {}\n", "Session:".dimmed(), label));
    }

    fn set_connection_status(&mut self, online: bool) {
        self.transcript.set_connection_status(online);
        if self.last_status == Some(online) {
            return;
        }
        self.last_status = Some(online);

        let status = if online {
            "Online".green()
        } else {
            "Offline".red()
        };
        self.emit(format_args!("{} {}\n", "Status:".dimmed(), status));
    }

    fn append_message(&mut self, message: ChatMessage) {
        if message.sender == Sender::Bot {
            let time = format!("[{}]", message.time_label()).dimmed();
            let text = if message.is_error {
                message.text.red().to_string()
            } else {
                format_bot_terminal(&message.text)
            };
            self.emit(format_args!("{} {} {}\n", time, "Bot>".bold(), text));
        }

        self.transcript.append_message(message);
    }

    fn show_loading(&mut self) -> String {
        self.emit(format_args!("{}", "...".dimmed()));
        self.transcript.show_loading()
    }

    fn remove_loading(&mut self, id: &str) {
        if self.transcript.has_loading() {
            // erase the dots on the current line
            self.emit(format_args!("\r\x1b[2K"));
        }
        self.transcript.remove_loading(id);
    }

    fn clear_input(&mut self) {
        self.transcript.clear_input();
    }

    fn set_send_enabled(&mut self, enabled: bool) {
        self.transcript.set_send_enabled(enabled);
    }

    fn focus_input(&mut self) {
        self.transcript.focus_input();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(view: TerminalView<Vec<u8>>) -> String {
        String::from_utf8(view.into_inner()).unwrap()
    }

    #[test]
    fn status_is_printed_on_change_only() {
        colored::control::set_override(false);
        let mut view = TerminalView::new(Vec::new());
        view.set_connection_status(true);
        view.set_connection_status(true);
        view.set_connection_status(false);

        let out = output(view);
        assert_eq!(out.matches("Online").count(), 1);
        assert_eq!(out.matches("Offline").count(), 1);
    }

    #[test]
    fn messages_are_mirrored() {
        colored::control::set_override(false);
        let mut view = TerminalView::new(Vec::new());
        view.append_message(ChatMessage::user("<b>oi</b>"));
        view.append_message(ChatMessage::bot("**Olá**"));

        assert_eq!(view.transcript().messages().count(), 2);
        let out = output(view);
        assert!(out.contains("Bot> Olá"));
    }

    #[test]
    fn typed_input_is_not_echoed() {
        colored::control::set_override(false);
        let mut view = TerminalView::new(Vec::new());
        view.prompt();
        view.append_message(ChatMessage::user("qual meu saldo?"));

        assert_eq!(view.transcript().messages().count(), 1);
        let out = output(view);
        assert_eq!(out, "\nUser> ");
        assert!(!out.contains("qual meu saldo?"));
    }

    #[test]
    fn error_replies_are_printed() {
        colored::control::set_override(false);
        let mut view = TerminalView::new(Vec::new());
        view.append_message(ChatMessage::error("falhou"));
        assert!(output(view).contains("Bot> falhou"));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn write_failures_do_not_lose_the_transcript() {
        let mut view = TerminalView::new(BrokenPipe);
        view.set_session_label("171800000000...");
        view.set_connection_status(true);
        view.append_message(ChatMessage::bot("oi"));
        let id = view.show_loading();
        view.remove_loading(&id);
        view.notice("still here");

        let transcript = view.transcript();
        assert_eq!(transcript.session_label(), "171800000000...");
        assert!(transcript.is_online());
        assert_eq!(transcript.messages().count(), 1);
        assert!(!transcript.has_loading());
    }

    #[test]
    fn loading_is_erased() {
        colored::control::set_override(false);
        let mut view = TerminalView::new(Vec::new());
        let id = view.show_loading();
        view.remove_loading(&id);
        assert!(!view.transcript().has_loading());
        assert!(output(view).ends_with("...\r\x1b[2K"));
    }
}
