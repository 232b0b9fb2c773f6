//! OddsVector — Odds Collector
//!
//! What it does:
//!   1. Every COLLECTION_INTERVAL fetches each configured betting site
//!   2. Extracts plausible decimal odds from the page (odds_extractor)
//!   3. Logs observations as JSONL, blacklists sites that keep failing
//!   4. Every PREDICTION_INTERVAL turns the latest odds into a prediction
//!
//! What it does NOT do: talk to Telegram subscribers (separate service)
//!
//! Run:
//!   cargo run --bin odds-collector

mod collector;
mod settings;

use anyhow::Result;
use chrono::Utc;
use collector::Collector;
use dotenv::dotenv;
use settings::Settings;
use std::env;
use std::fs::File;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let settings = Settings::from_env();

    info!("=== OddsVector Collector ===");
    info!("Sites: {}", settings.sites.join(", "));
    info!("Collection every {}s, predictions every {}s", settings.collection_interval_secs, settings.prediction_interval_secs);
    info!("Logs: {}/", settings.log_dir);

    // Single instance lock
    let lock_file_path = env::temp_dir().join("oddsvector_collector.lock");
    let lock_file = match File::create(&lock_file_path) {
        Ok(f) => f,
        Err(e) => {
            warn!("Failed to create lock file at {:?}: {}", lock_file_path, e);
            return Ok(());
        }
    };

    let mut lock = fd_lock::RwLock::new(lock_file);
    let _write_guard = match lock.try_write() {
        Ok(guard) => {
            info!("Acquired single-instance lock.");
            guard
        }
        Err(_) => {
            warn!("Another instance of odds-collector is already running! Exiting.");
            return Ok(());
        }
    };

    let mut collector = Collector::new(&settings)?;

    let mut collect_tick = interval(Duration::from_secs(settings.collection_interval_secs));
    let mut predict_tick = interval(Duration::from_secs(settings.prediction_interval_secs));
    collect_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    predict_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = collect_tick.tick() => {
                info!("--- Collection cycle ({} sites) ---", collector.sites().len());
                collector.collect_once().await;
            }
            _ = predict_tick.tick() => {
                collector.predict_all(Utc::now());
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl-C received, shutting down.");
                break;
            }
        }
    }

    Ok(())
}
