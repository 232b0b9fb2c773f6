//! Prediction Engine — one figure from the most recently seen odds
//! Heuristic instead of ML: mean odds + confidence from count and spread

use chrono::{DateTime, Utc};
use odds_extractor::OddsSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use tracing::debug;

/// Site label used when a prediction is not tied to one site.
pub const GLOBAL_SITE: &str = "global";

const FALLBACK_CONFIDENCE: u8 = 35;
const MIN_CONFIDENCE: i64 = 40;
const MAX_CONFIDENCE: i64 = 95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionSource {
    /// Aggregated from extracted odds.
    Observed,
    /// No odds available; seeded pseudo-random placeholder.
    Fallback,
}

impl PredictionSource {
    pub fn as_str(self) -> &'static str {
        match self {
            PredictionSource::Observed => "observed",
            PredictionSource::Fallback => "fallback",
        }
    }
}

/// Aggregate odds figure + confidence (0–100).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub odds:       f64,
    pub confidence: u8,
    pub source:     PredictionSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub site:       String,
    pub odds:       f64,
    pub confidence: u8,
    pub source:     PredictionSource,
    pub ts:         i64,
}

/// Mean of the set, confidence growing with count and shrinking with spread.
/// Empty set → placeholder seeded from the current minute.
pub fn heuristic_from_odds(odds: &OddsSet, now: DateTime<Utc>) -> Estimate {
    let (Some(max), Some(min)) = (odds.max(), odds.min()) else {
        return fallback_estimate(None, now);
    };

    let values = odds.values();
    let n = values.len() as f64;
    let avg = values.iter().sum::<f64>() / n;
    let spread = max.as_f64() - min.as_f64();

    // Truncation toward zero before clamping.
    let raw_conf = (50.0 + n.sqrt() * 5.0 - spread) as i64;

    Estimate {
        odds:       round2(avg),
        confidence: raw_conf.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE) as u8,
        source:     PredictionSource::Observed,
    }
}

fn fallback_estimate(site: Option<&str>, now: DateTime<Utc>) -> Estimate {
    let mut rng = StdRng::seed_from_u64(minute_seed(site, now));
    Estimate {
        odds:       round2(1.05 + rng.gen::<f64>() * 2.0),
        confidence: FALLBACK_CONFIDENCE,
        source:     PredictionSource::Fallback,
    }
}

/// Stable for every call within the same minute.
fn minute_seed(site: Option<&str>, now: DateTime<Utc>) -> u64 {
    let mut hasher = DefaultHasher::new();
    site.unwrap_or("").hash(&mut hasher);
    (now.timestamp() / 60).hash(&mut hasher);
    hasher.finish()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Keeps the last observed odds per site.
#[derive(Default)]
pub struct PredictionEngine {
    latest: HashMap<String, OddsSet>,
}

impl PredictionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the site's previous observation.
    pub fn record_observation(&mut self, site: &str, odds: OddsSet) {
        self.latest.insert(site.to_string(), odds);
    }

    /// Prediction for one site, or a global one when `site` is `None`.
    pub fn predict(&self, site: Option<&str>, now: DateTime<Utc>) -> Prediction {
        let estimate = match site.and_then(|s| self.latest.get(s)) {
            Some(odds) if !odds.is_empty() => heuristic_from_odds(odds, now),
            _ => fallback_estimate(site, now),
        };

        let site = site.unwrap_or(GLOBAL_SITE).to_string();
        debug!(site = %site, odds = estimate.odds, confidence = estimate.confidence, "prediction");

        Prediction {
            site,
            odds:       estimate.odds,
            confidence: estimate.confidence,
            source:     estimate.source,
            ts:         now.timestamp(),
        }
    }

    /// One prediction per site, in order. No sites → one global prediction.
    pub fn batch_predict(&self, sites: &[String], now: DateTime<Utc>) -> Vec<Prediction> {
        if sites.is_empty() {
            return vec![self.predict(None, now)];
        }
        sites.iter().map(|s| self.predict(Some(s.as_str()), now)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use odds_extractor::OddsValue;

    fn set(values: &[f64]) -> OddsSet {
        values.iter().copied().filter_map(OddsValue::from_raw).collect()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_heuristic_average_and_confidence() {
        // avg 2.0; 50 + sqrt(3)*5 - 1.0 = 57.66 → 57
        let est = heuristic_from_odds(&set(&[1.5, 2.0, 2.5]), at(0));
        assert_eq!(est.odds, 2.0);
        assert_eq!(est.confidence, 57);
        assert_eq!(est.source, PredictionSource::Observed);
    }

    #[test]
    fn test_heuristic_confidence_clamped() {
        // Wide spread drags the score below the floor.
        let low = heuristic_from_odds(&set(&[1.5, 80.0]), at(0));
        assert_eq!(low.confidence, 40);

        // 100 tight values: 50 + 50 - 0.99 → 99, capped.
        let many: Vec<f64> = (101..=200).map(|h| f64::from(h) / 100.0).collect();
        let tight = set(&many);
        let high = heuristic_from_odds(&tight, at(0));
        assert_eq!(tight.len(), 100);
        assert_eq!(high.confidence, 95);
    }

    #[test]
    fn test_fallback_is_stable_within_minute() {
        let a = heuristic_from_odds(&OddsSet::new(), at(120));
        let b = heuristic_from_odds(&OddsSet::new(), at(179));
        assert_eq!(a, b);
        assert_eq!(a.confidence, 35);
        assert_eq!(a.source, PredictionSource::Fallback);
        assert!((1.05..=3.05).contains(&a.odds));
    }

    #[test]
    fn test_engine_uses_latest_observation() {
        let mut engine = PredictionEngine::new();
        engine.record_observation("BetPawa", set(&[9.0]));
        engine.record_observation("BetPawa", set(&[2.4, 1.6]));

        let p = engine.predict(Some("BetPawa"), at(1_700_000_000));
        assert_eq!(p.site, "BetPawa");
        assert_eq!(p.odds, 2.0);
        assert_eq!(p.source, PredictionSource::Observed);
        assert_eq!(p.ts, 1_700_000_000);
    }

    #[test]
    fn test_engine_unknown_site_falls_back() {
        let engine = PredictionEngine::new();
        let p = engine.predict(Some("Betfred"), at(0));
        assert_eq!(p.site, "Betfred");
        assert_eq!(p.source, PredictionSource::Fallback);
    }

    #[test]
    fn test_batch_predict() {
        let mut engine = PredictionEngine::new();
        engine.record_observation("1xBet", set(&[1.45, 2.5]));

        let global = engine.batch_predict(&[], at(0));
        assert_eq!(global.len(), 1);
        assert_eq!(global[0].site, GLOBAL_SITE);

        let sites = vec!["1xBet".to_string(), "Bet9ja".to_string()];
        let preds = engine.batch_predict(&sites, at(0));
        assert_eq!(preds.iter().map(|p| p.site.as_str()).collect::<Vec<_>>(), vec!["1xBet", "Bet9ja"]);
        assert_eq!(preds[0].source, PredictionSource::Observed);
        assert_eq!(preds[1].source, PredictionSource::Fallback);
    }

    #[test]
    fn test_prediction_serializes_source_lowercase() {
        let engine = PredictionEngine::new();
        let json = serde_json::to_value(engine.predict(None, at(0))).unwrap();
        assert_eq!(json["source"], "fallback");
        assert_eq!(json["site"], "global");
    }
}
