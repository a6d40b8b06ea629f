mod commands;
mod config;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::Command;
use config::CliConfig;
use portana_api::{ClientProvider, FileCredentialStore, PortanaServices, StaticConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Backend base URL (overrides PORTANA_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::from_env().with_api_url(cli.api_url);
    init_tracing(&config.log_format);

    let store = Arc::new(
        FileCredentialStore::new(config.credentials_file.clone(), config.credentials_key.as_deref())
            .context("Failed to open credentials file")?,
    );
    let source = match &config.api_url {
        Some(url) => StaticConfig::new(url.clone()),
        None => StaticConfig::empty(),
    };
    let provider = Arc::new(ClientProvider::with_credentials(Arc::new(source), store.clone()));
    let services = PortanaServices::new(provider);

    commands::run(cli.command, &services, &store).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_subcommands() {
        let cli = Cli::try_parse_from(["portana", "--api-url", "http://x", "positions", "42"]).unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://x"));
        assert!(matches!(cli.command, Command::Positions { user_id: Some(ref id) } if id == "42"));

        let cli = Cli::try_parse_from(["portana", "realized-pnl"]).unwrap();
        assert!(matches!(cli.command, Command::RealizedPnl { user_id: None }));

        let cli = Cli::try_parse_from(["portana", "login", "--user-id", "42", "--token", "abc"])
            .unwrap();
        assert!(matches!(cli.command, Command::Login { ref token, .. } if token == "abc"));
    }

    #[test]
    fn account_positions_requires_an_id() {
        assert!(Cli::try_parse_from(["portana", "account-positions"]).is_err());
    }
}
