pub mod commands;

use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use crate::api::{ChatBackend, HttpBackend};
use crate::chat::{ChatController, SubmitOutcome};
use crate::cli::commands::{Commands, SessionAction};
use crate::config::AppConfig;
use crate::identity::{FileStore, IdentityStore, StorageError};
use crate::ui::TerminalView;

type TerminalController = ChatController<FileStore, TerminalView>;

/// Runs one CLI command and returns the process exit code.
pub async fn run_cli(command: Commands, config: AppConfig) -> i32 {
    match command {
        Commands::Chat { transcript } => run_repl(config, transcript.as_deref()).await,
        Commands::Send { message } => run_send(config, &message).await,
        Commands::Health => run_health(config).await,
        Commands::Session { action } => run_session(config, action),
    }
}

fn open_identity(config: &AppConfig) -> Result<IdentityStore<FileStore>, StorageError> {
    let store = FileStore::open(config.storage.resolved_path())?;
    IdentityStore::new(store)
}

fn build_controller(config: &AppConfig) -> Result<Arc<TerminalController>, StorageError> {
    let identity = open_identity(config)?;
    let backend: Arc<dyn ChatBackend> = Arc::new(HttpBackend::new(config.api.base_url.clone()));
    Ok(ChatController::new(identity, backend, TerminalView::stdout()))
}

async fn run_repl(config: AppConfig, transcript_path: Option<&Path>) -> i32 {
    let controller = match build_controller(&config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to open identity storage: {}", e);
            return 1;
        }
    };

    println!("--- Support Chat ---");
    println!("Service: {}", config.api.base_url);
    println!("Commands: /reset /status /session /exit");
    println!("--------------------");

    let _polling = controller.init(config.health.interval());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        controller.with_view(|v| v.prompt());

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        };

        match line.trim() {
            "/exit" | "/quit" => break,
            "/status" => {
                let status = if controller.is_connected() { "Online" } else { "Offline" };
                controller.with_view(|v| v.notice(&format!("Status: {}", status)));
            }
            "/session" => {
                let text = format!(
                    "Session: {}\nClient:  {}",
                    controller.session_id(),
                    controller.client_id()
                );
                controller.with_view(|v| v.notice(&text));
            }
            "/reset" => {
                if let Err(e) = controller.reset_session() {
                    error!("Failed to reset session: {}", e);
                }
            }
            text => {
                controller.submit(text).await;
            }
        }
    }

    if let Some(path) = transcript_path {
        let html = controller.with_view(|v| v.transcript().to_document());
        match std::fs::write(path, html) {
            Ok(_) => println!("Transcript written to: {}", path.display()),
            Err(e) => {
                error!("Failed to write transcript {}: {}", path.display(), e);
                return 1;
            }
        }
    }

    0
}

async fn run_send(config: AppConfig, message: &str) -> i32 {
    let controller = match build_controller(&config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to open identity storage: {}", e);
            return 1;
        }
    };

    match controller.submit(message).await {
        SubmitOutcome::Replied => 0,
        SubmitOutcome::Failed => 1,
        SubmitOutcome::Ignored => {
            eprintln!("Nothing to send.");
            2
        }
    }
}

async fn run_health(config: AppConfig) -> i32 {
    let backend = HttpBackend::new(config.api.base_url.clone());
    info!("Probing {}/health", backend.base_url());

    match backend.health().await {
        Ok(health) if health.is_alive() => {
            println!("Online");
            0
        }
        Ok(health) => {
            println!("Offline (status: {})", health.status);
            1
        }
        Err(e) => {
            error!("Health check failed: {}", e);
            println!("Offline");
            1
        }
    }
}

fn run_session(config: AppConfig, action: SessionAction) -> i32 {
    let mut identity = match open_identity(&config) {
        Ok(i) => i,
        Err(e) => {
            error!("Failed to open identity storage: {}", e);
            return 1;
        }
    };

    match action {
        SessionAction::Show => {
            println!("Session: {}", identity.session_id());
            println!("Client:  {}", identity.client_id());
            0
        }
        SessionAction::Reset => match identity.reset_session() {
            Ok(session_id) => {
                println!("New session: {}", session_id);
                0
            }
            Err(e) => {
                error!("Failed to reset session: {}", e);
                1
            }
        },
    }
}
