use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use medicare_hub::cli::{self, Cli, Commands};
use medicare_hub::config::Config;
use medicare_hub::error::Resolution;
use medicare_hub::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Setup logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let cli = Cli::parse();

    if let Commands::Config = cli.command {
        return cli::handle_config_validate(&config);
    }

    let state = AppState::from_config(&config)?;
    tracing::debug!(base_url = %config.api_base_url, "Client initialized");

    if let Err(e) = cli::run(&state, cli.command).await {
        tracing::debug!("Command failed: {}", e);
        match e.resolution() {
            Resolution::Redirect(path) => eprintln!("✗ {} (redirected to {})", e, path),
            Resolution::Notify(message) => eprintln!("✗ {}", message),
        }
        std::process::exit(1);
    }

    Ok(())
}
