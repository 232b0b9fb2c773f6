//! Diagnostic binary: extract odds from a local HTML file
//! Run: cargo run --bin extract-html -- page.html

use anyhow::{Context, Result};
use odds_extractor::extract_odds;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")?;

    let path = std::env::args()
        .nth(1)
        .context("usage: extract-html <file.html>")?;

    let html = std::fs::read_to_string(&path).with_context(|| format!("read {path}"))?;
    let result = extract_odds(html.as_str());

    info!("{}: site={} odds={}", path, result.site.name(), result.odds.len());
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
