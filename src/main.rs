//! betledger — minimal wagering ledger over HTTP.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! wires store → service → API, and serves until shutdown.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use betledger::api;
use betledger::config::AppConfig;
use betledger::service::BetService;
use betledger::store::MemoryStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = AppConfig::load("config.toml")?;

    init_logging();

    info!(
        host = %cfg.server.host,
        port = cfg.server.port,
        starting_balance = cfg.ledger.starting_balance,
        "betledger starting up"
    );

    let store = Arc::new(MemoryStore::new());
    let service = Arc::new(BetService::with_starting_balance(
        store,
        cfg.ledger.starting_balance,
    ));

    api::serve(service, &cfg.server.host, cfg.server.port).await?;

    info!("betledger shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("betledger=info"));

    let json_logging = std::env::var("BETLEDGER_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
