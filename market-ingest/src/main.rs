use anyhow::{bail, Context, Result};
use clap::Parser;
use market_core::{ProviderList, Rate, Ticker};
use market_storage::{BatchError, KeyValueStore, LmdbStore, MarketStorage, StorageConfig};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn, Level};
use tracing_subscriber;

/// Market Data Ingestion CLI
///
/// Loads tickers and exchange rates from JSON files and saves them into the
/// LMDB market store, arbitrating each record against what is already stored.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// LMDB directory (created if missing)
    #[arg(short = 'd', long, default_value = "./data/market-lmdb")]
    lmdb_path: PathBuf,

    /// Provider priority, most trusted first (comma-separated)
    #[arg(short, long, value_delimiter = ',', default_value = "")]
    providers: Vec<String>,

    /// JSON file containing an array of tickers
    #[arg(short, long)]
    tickers: Option<PathBuf>,

    /// JSON file containing an array of rates
    #[arg(short, long)]
    rates: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,
}

impl Args {
    /// Parse log level from string
    fn parse_log_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    fn provider_list(&self) -> ProviderList {
        ProviderList::new(self.providers.iter().map(|p| p.trim()).filter(|p| !p.is_empty()))
    }
}

/// Counts from a ticker ingestion run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct TickerStats {
    saved: usize,
    rejected: usize,
    failed: usize,
}

fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Submit tickers one by one; rejections and store errors are counted, not fatal
fn ingest_tickers<S: KeyValueStore>(
    storage: &MarketStorage<S>,
    tickers: &[Ticker],
    providers: &ProviderList,
) -> TickerStats {
    let mut stats = TickerStats::default();

    for ticker in tickers {
        match storage.submit_ticker(ticker, providers) {
            Ok(()) => stats.saved += 1,
            Err(e) if e.is_rejection() => {
                info!("  {} {}: {}", ticker.coin_name, ticker.token_id, e);
                stats.rejected += 1;
            }
            Err(e) => {
                warn!("  {} {}: {}", ticker.coin_name, ticker.token_id, e);
                stats.failed += 1;
            }
        }
    }

    stats
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(args.parse_log_level())
        .with_target(false)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    info!("🚀 Market Data Ingestion Tool");
    info!("=============================");

    if args.tickers.is_none() && args.rates.is_none() {
        bail!("Nothing to ingest: pass --tickers and/or --rates");
    }

    let providers = args.provider_list();

    info!("Configuration:");
    info!("  LMDB path: {}", args.lmdb_path.display());
    info!("  Providers: {:?}", providers.providers());
    info!("");

    let config = StorageConfig {
        lmdb_path: args.lmdb_path.clone(),
        ..StorageConfig::default()
    };
    let storage = MarketStorage::new(LmdbStore::open(&config)?);

    if let Some(path) = &args.tickers {
        let tickers: Vec<Ticker> = read_json_array(path)?;
        info!("Ingesting {} tickers from {}", tickers.len(), path.display());

        let stats = ingest_tickers(&storage, &tickers, &providers);
        info!(
            "✅ Tickers: {} saved, {} rejected, {} failed",
            stats.saved, stats.rejected, stats.failed
        );
    }

    if let Some(path) = &args.rates {
        let rates: Vec<Rate> = read_json_array(path)?;
        info!("Ingesting {} rates from {}", rates.len(), path.display());

        match storage.submit_rates(&rates, &providers) {
            Ok(summary) => info!(
                "✅ Rates: {} written, {} skipped of {}",
                summary.written, summary.skipped, summary.total
            ),
            Err(e @ BatchError::Partial { .. }) => {
                warn!("{}", e);
                for failure in e.failures() {
                    warn!("  {}: {}", failure.rate.currency, failure.reason);
                }
            }
            Err(e) => {
                error!("{}", e);
                return Err(e.into());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_storage::MemoryStore;

    fn args(providers: Vec<&str>) -> Args {
        Args {
            lmdb_path: PathBuf::from("/tmp/unused"),
            providers: providers.into_iter().map(String::from).collect(),
            tickers: None,
            rates: None,
            log_level: "debug".to_string(),
        }
    }

    #[test]
    fn test_provider_list_skips_blanks() {
        let list = args(vec!["binance", " ", "cmc"]).provider_list();
        assert_eq!(list.providers().len(), 2);
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(args(vec![]).parse_log_level(), Level::DEBUG);
    }

    #[test]
    fn test_ingest_tickers_counts_rejections() {
        let storage = MarketStorage::new(MemoryStore::new());
        let providers = ProviderList::new(["binance", "cmc"]);

        let tickers: Vec<Ticker> = serde_json::from_str(
            r#"[
                {"coin_name":"BTC","price":{"value":68000.0,"provider":"binance"},"last_update":"2024-03-01T12:00:00Z"},
                {"coin_name":"btc","price":{"value":69000.0,"provider":"cmc"},"last_update":"2024-03-01T12:01:00Z"},
                {"coin_name":"ETH","price":{"value":3000.0,"provider":"cmc"},"last_update":"2024-03-01T12:00:00Z"}
            ]"#,
        )
        .unwrap();

        let stats = ingest_tickers(&storage, &tickers, &providers);
        assert_eq!(
            stats,
            TickerStats {
                saved: 2,
                rejected: 1,
                failed: 0
            }
        );
    }

    #[test]
    fn test_read_json_array_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rates.json");
        std::fs::write(
            &path,
            r#"[{"currency":"EUR","rate":0.92,"provider":"fixer","timestamp":100}]"#,
        )
        .unwrap();

        let rates: Vec<Rate> = read_json_array(&path).unwrap();
        assert_eq!(rates.len(), 1);
        assert!(read_json_array::<Rate>(&dir.path().join("missing.json")).is_err());
    }
}
