use clap::Parser;
use supportchat::cli::{
    commands::{Cli, Commands},
    run_cli,
};
use supportchat::config::AppConfig;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Using support service at {}", config.api.base_url);

    let command = cli.command.unwrap_or(Commands::Chat { transcript: None });
    let code = run_cli(command, config).await;

    std::process::exit(code);
}
