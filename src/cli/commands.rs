use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "supportchat", version, about = "Support Chat Client", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Override the config file path globally
    #[arg(short, long, global = true, default_value = "config.yaml")]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Enter the interactive chat REPL (default)
    Chat {
        /// Write the conversation as an HTML page on exit
        #[arg(short, long)]
        transcript: Option<PathBuf>,
    },

    /// Send a single message and print the reply
    Send {
        /// The message text
        message: String,
    },

    /// Probe the service health endpoint once
    Health,

    /// Inspect or rotate the stored session identifier
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Subcommand)]
pub enum SessionAction {
    /// Show the stored session and client identifiers
    Show,

    /// Replace the session identifier, keeping the client identifier
    Reset,
}
