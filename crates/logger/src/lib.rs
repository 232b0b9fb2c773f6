//! OddsVector — Logger
//! JSONL event stream, NTFY admin alerts

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct EventLogger {
    log_dir: PathBuf,
}

impl EventLogger {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        let dir = log_dir.into();
        fs::create_dir_all(&dir).ok();
        Self { log_dir: dir }
    }

    /// Appends one JSON line to today's (UTC) file.
    pub fn log<T: Serialize>(&self, event: &T) -> Result<()> {
        let date  = Utc::now().format("%Y-%m-%d").to_string();
        let path  = self.log_dir.join(format!("{date}.jsonl"));
        let line  = serde_json::to_string(event)?;
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("open {}", path.display()))?;
        writeln!(f, "{line}")?;
        Ok(())
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

pub fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

// ── Event types ───────────────────────────────────────────────────────────────

#[derive(Serialize, Debug)]
pub struct ObservationEvent {
    pub ts:         String,
    pub event:      &'static str,   // "ODDS_OBSERVATION"
    pub site:       String,
    pub odds:       Vec<f64>,       // descending
    pub odds_count: usize,
}

#[derive(Serialize, Debug)]
pub struct FetchStatusEvent {
    pub ts:      String,
    pub event:   &'static str,      // "FETCH_STATUS"
    pub site:    String,
    pub ok:      bool,
    pub skipped: bool,              // blacklisted → no request made
    pub message: String,
}

#[derive(Serialize, Debug)]
pub struct PredictionEvent {
    pub ts:         String,
    pub event:      &'static str,   // "PREDICTION"
    pub site:       String,
    pub odds:       f64,
    pub confidence: u8,             // 0–100
    pub source:     String,         // "observed" | "fallback"
}

#[derive(Serialize, Debug)]
pub struct SiteBlacklistedEvent {
    pub ts:      String,
    pub event:   &'static str,      // "SITE_BLACKLISTED"
    pub site:    String,
    pub until:   i64,               // unix seconds
    pub message: String,
}

/// Push alert for admins. Empty topic disables it.
pub async fn send_ntfy_alert(topic: &str, msg: &str, title: &str) {
    if topic.is_empty() {
        tracing::debug!("NTFY disabled, alert dropped: {}", title);
        return;
    }
    let client = reqwest::Client::new();
    match client
        .post(format!("https://ntfy.sh/{topic}"))
        .header("Title", title)
        .header("Priority", "high")
        .header("Tags", "warning")
        .body(msg.to_string())
        .send()
        .await
    {
        Ok(_)  => tracing::info!("NTFY sent: {}", title),
        Err(e) => tracing::warn!("NTFY failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let logger = EventLogger::new(dir.path().join("events"));

        for site in ["BetPawa", "1xBet"] {
            logger
                .log(&ObservationEvent {
                    ts:         now_iso(),
                    event:      "ODDS_OBSERVATION",
                    site:       site.to_string(),
                    odds:       vec![2.4, 1.6],
                    odds_count: 2,
                })
                .unwrap();
        }

        let date = Utc::now().format("%Y-%m-%d").to_string();
        let content = fs::read_to_string(logger.log_dir().join(format!("{date}.jsonl"))).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "ODDS_OBSERVATION");
        assert_eq!(lines[0]["site"], "BetPawa");
        assert_eq!(lines[1]["odds"], serde_json::json!([2.4, 1.6]));
    }

    #[tokio::test]
    async fn test_ntfy_disabled_without_topic() {
        // Must return without touching the network.
        send_ntfy_alert("", "msg", "title").await;
    }
}
