//! Vigilia MCP Server
//!
//! Run with: vigilia-server

use std::sync::atomic::Ordering;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vigilia::config::DEFAULT_BASE_URL;
use vigilia::mcp::McpServer;
use vigilia::{ApiClient, Config, VigiliaHandler};

#[derive(Parser, Debug)]
#[command(name = "vigilia-server")]
#[command(about = "Vigilia MCP server for AML/KYC vigilance")]
struct Args {
    /// Vigilance platform API key
    #[arg(long, env = "VIGILIA_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Vigilance platform base URL
    #[arg(long, env = "VIGILIA_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Request timeout in milliseconds
    #[arg(long, env = "VIGILIA_TIMEOUT_MS", default_value = "30000")]
    timeout_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to stderr (stdout is for MCP protocol)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = Arc::new(Config::new(args.api_key, args.api_url, args.timeout_ms)?);
    tracing::info!(
        base_url = %config.base_url,
        timeout_ms = config.timeout_ms,
        version = vigilia::VERSION,
        "starting vigilia-mcp"
    );

    let client = ApiClient::new(config)?;
    let handler = VigiliaHandler::new(client)?;

    // On SIGINT the server drains: in-flight calls finish, new ones are
    // refused, and the process exits when stdin closes.
    let draining = handler.shutdown_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received, draining");
            draining.store(true, Ordering::SeqCst);
        }
    });

    McpServer::new(handler).run().await?;

    tracing::info!("stdin closed, exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn base_url_defaults_when_not_given() {
        let args = Args::try_parse_from(["vigilia-server", "--api-key", "sk-test"]).unwrap();
        assert_eq!(args.api_url, DEFAULT_BASE_URL);
        assert_eq!(args.timeout_ms, 30_000);
    }
}
