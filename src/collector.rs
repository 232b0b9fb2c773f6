//! Collection cycle: fetch each configured site, track failures, record
//! observations, and turn the latest observations into predictions.

use anyhow::Result;
use chrono::{DateTime, Utc};
use logger::{
    now_iso, send_ntfy_alert, EventLogger, FetchStatusEvent, ObservationEvent, PredictionEvent,
    SiteBlacklistedEvent,
};
use prediction_engine::{Prediction, PredictionEngine};
use site_fetcher::{LatestOdds, SiteBlacklist, SiteFetcher};
use tracing::{info, warn};

use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionOutcome {
    pub site:       String,
    pub odds_count: usize,
    pub ok:         bool,
    pub skipped:    bool,
}

pub struct Collector {
    fetcher:    SiteFetcher,
    blacklist:  SiteBlacklist,
    engine:     PredictionEngine,
    logger:     EventLogger,
    sites:      Vec<String>,
    ntfy_topic: String,
}

impl Collector {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            fetcher:    SiteFetcher::new(&settings.fetch)?,
            blacklist:  SiteBlacklist::new(settings.failure_threshold, settings.blacklist_duration_secs),
            engine:     PredictionEngine::new(),
            logger:     EventLogger::new(&settings.log_dir),
            sites:      settings.sites.clone(),
            ntfy_topic: settings.ntfy_topic.clone(),
        })
    }

    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    /// One pass over all configured sites.
    pub async fn collect_once(&mut self) -> Vec<CollectionOutcome> {
        let mut outcomes = Vec::with_capacity(self.sites.len());

        for site in self.sites.clone() {
            let now = Utc::now();
            if self.blacklist.is_blacklisted(&site, now.timestamp()) {
                info!("Skipping blacklisted site {}", site);
                self.log_fetch_status(&site, false, true, "blacklisted");
                outcomes.push(CollectionOutcome { site, odds_count: 0, ok: false, skipped: true });
                continue;
            }

            let data = self.fetcher.get_latest_odds(Some(site.as_str())).await;
            let (outcome, alert) = self.apply_result(&site, data, now);
            if let Some(alert) = alert {
                send_ntfy_alert(&self.ntfy_topic, &alert, "Site blacklisted").await;
            }
            outcomes.push(outcome);
        }

        let ok = outcomes.iter().filter(|o| o.ok).count();
        let skipped = outcomes.iter().filter(|o| o.skipped).count();
        let odds: usize = outcomes.iter().map(|o| o.odds_count).sum();
        info!(
            "Collection cycle done: {}/{} sites ok, {} skipped, {} odds total",
            ok, outcomes.len(), skipped, odds
        );
        outcomes
    }

    /// Books one fetch result. Returns the admin alert text if the site just
    /// got blacklisted.
    pub fn apply_result(
        &mut self,
        site: &str,
        data: LatestOdds,
        now: DateTime<Utc>,
    ) -> (CollectionOutcome, Option<String>) {
        let ts = now.timestamp();
        let mut alert = None;

        let ok = match &data.error {
            Some(err) => {
                warn!("Collection returned error for {}: {}", site, err);
                self.log_fetch_status(site, false, false, err);
                alert = self.blacklist.record_failure(site, ts);
                if let Some(msg) = &alert {
                    let until = self.blacklist.health(site).and_then(|h| h.blacklisted_until).unwrap_or(ts);
                    self.log_event(&SiteBlacklistedEvent {
                        ts:      now_iso(),
                        event:   "SITE_BLACKLISTED",
                        site:    site.to_string(),
                        until,
                        message: msg.clone(),
                    });
                }
                false
            }
            None => {
                self.blacklist.reset_failures(site);
                self.log_fetch_status(site, true, false, "ok");
                true
            }
        };

        let observed_site = data.site.clone().unwrap_or_else(|| site.to_string());
        let odds_count = data.odds.len();
        self.log_event(&ObservationEvent {
            ts:    now_iso(),
            event: "ODDS_OBSERVATION",
            site:  observed_site,
            odds:  data.odds.values(),
            odds_count,
        });
        if ok {
            self.engine.record_observation(site, data.odds);
        }

        (CollectionOutcome { site: site.to_string(), odds_count, ok, skipped: false }, alert)
    }

    /// Predictions for every configured site from their latest observation.
    pub fn predict_all(&self, now: DateTime<Utc>) -> Vec<Prediction> {
        let predictions = self.engine.batch_predict(&self.sites, now);
        for p in &predictions {
            info!("Prediction {}: {:.2} ({}% confidence, {})", p.site, p.odds, p.confidence, p.source.as_str());
            self.log_event(&PredictionEvent {
                ts:         now_iso(),
                event:      "PREDICTION",
                site:       p.site.clone(),
                odds:       p.odds,
                confidence: p.confidence,
                source:     p.source.as_str().to_string(),
            });
        }
        predictions
    }

    fn log_fetch_status(&self, site: &str, ok: bool, skipped: bool, message: &str) {
        self.log_event(&FetchStatusEvent {
            ts:      now_iso(),
            event:   "FETCH_STATUS",
            site:    site.to_string(),
            ok,
            skipped,
            message: message.to_string(),
        });
    }

    fn log_event<T: serde::Serialize>(&self, event: &T) {
        if let Err(e) = self.logger.log(event) {
            warn!("Event log write failed: {:#}", e);
        }
    }
}
