//! Gameflip Auto-Lister - Entry Point
//!
//! Posts one CSV row as a Gameflip listing every interval and deletes
//! listings once they pass the expiry window. Runs until SIGINT.
//!
//! Wiring sequence:
//! 1. Load `.env`, then config.json (path from `GF_CONFIG`) + validate
//! 2. Init tracing (human-readable or JSON)
//! 3. Create GfClient (HMAC auth + timeout + DELETE retries)
//! 4. Open the file repository (posted.json + dead-letter log)
//! 5. Read listings.csv once
//! 6. Run the purge → post → persist → sleep loop until Ctrl-C

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gameflip_autolister::adapters::api::{GameflipMarketplace, GfAuth, GfClient, GfClientConfig};
use gameflip_autolister::adapters::input::load_rows;
use gameflip_autolister::adapters::persistence::FileRepository;
use gameflip_autolister::config::{self, AppConfig};
use gameflip_autolister::usecases::{Runner, RunnerSettings};

/// Config file used when `GF_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "config.json";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // ── 1. Environment and configuration ────────────────────
    dotenvy::dotenv().ok();
    let config_path =
        std::env::var("GF_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = config::loader::load_config(&config_path)
        .context("Failed to load configuration")?;

    // ── 2. Logging ──────────────────────────────────────────
    init_tracing(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path,
        "Starting Gameflip auto-lister"
    );

    // ── 3. Marketplace client ───────────────────────────────
    let auth = GfAuth::new(&config.api_key, &config.api_secret);
    let client = GfClient::new(auth, GfClientConfig::from(&config.api))
        .context("Failed to create Gameflip client")?;
    let market = GameflipMarketplace::new(client);

    // ── 4. Persistence ──────────────────────────────────────
    let repo = FileRepository::from_paths(&config.files.state, &config.files.dead_letter)
        .await
        .context("Failed to open state files")?;

    // ── 5. Input rows ───────────────────────────────────────
    let rows = load_rows(&config.files.listings)?;

    // ── 6. Main loop ────────────────────────────────────────
    let runner = Runner::start(market, repo, rows, RunnerSettings::from_config(&config)).await?;
    runner.run(signal::ctrl_c()).await?;

    info!("Shutdown complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    if config.logging.json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
