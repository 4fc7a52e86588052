mod config;
mod error;
mod handler;
mod protocol;
mod server;

use anyhow::Result;
use clap::Parser;
use market_core::ProviderList;
use market_storage::StorageConfig;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::ServerConfig;
use server::RpcServer;

#[derive(Parser)]
#[command(name = "market-rpc-server")]
#[command(about = "JSON-RPC server for arbitrated ticker and rate storage")]
struct Cli {
    /// Server host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Server port to bind to
    #[arg(long, default_value = "7880")]
    port: u16,

    /// LMDB directory (created if missing)
    #[arg(long, default_value = "./data/market-lmdb")]
    lmdb_path: PathBuf,

    /// LMDB map size in megabytes
    #[arg(long, default_value = "256")]
    map_size_mb: usize,

    /// Provider priority, most trusted first (comma-separated)
    #[arg(long, default_value = "")]
    providers: String,

    /// Maximum request line size in kilobytes
    #[arg(long, default_value = "1024")]
    max_request_kb: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn into_config(self) -> ServerConfig {
        ServerConfig {
            host: self.host,
            port: self.port,
            storage: StorageConfig {
                lmdb_path: self.lmdb_path,
                map_size: self.map_size_mb * 1024 * 1024,
                ..StorageConfig::default()
            },
            providers: ProviderList::from_csv(&self.providers),
            max_request_bytes: self.max_request_kb * 1024,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "market_rpc_server={},market_storage={}",
                cli.log_level, cli.log_level
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = cli.into_config();

    tracing::info!("🚀 Market JSON-RPC Server Starting");
    tracing::info!("Configuration:");
    tracing::info!("  Host: {}", config.host);
    tracing::info!("  Port: {}", config.port);
    tracing::info!("  LMDB path: {}", config.storage.lmdb_path.display());
    tracing::info!("  Map size: {} bytes", config.storage.map_size);
    tracing::info!("  Providers: {:?}", config.providers.providers());

    let server = RpcServer::new(config)?;
    server.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_into_config() {
        let cli = Cli::parse_from([
            "market-rpc-server",
            "--port",
            "9000",
            "--map-size-mb",
            "64",
            "--providers",
            "binance,coingecko",
        ]);

        let config = cli.into_config();
        assert_eq!(config.port, 9000);
        assert_eq!(config.storage.map_size, 64 * 1024 * 1024);
        assert_eq!(config.providers.providers().len(), 2);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_default_providers_empty() {
        let config = Cli::parse_from(["market-rpc-server"]).into_config();
        assert!(config.providers.is_empty());
        assert_eq!(config.max_request_bytes, 1024 * 1024);
    }
}
