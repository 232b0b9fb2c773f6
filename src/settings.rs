use site_fetcher::{all_sites, FetchConfig};
use std::str::FromStr;
use std::time::Duration;

/// Runtime configuration. Everything comes from the environment (`.env`
/// included); missing or unparsable values fall back to defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub collection_interval_secs: u64,
    pub prediction_interval_secs: u64,
    pub fetch:                    FetchConfig,
    pub failure_threshold:        u32,
    pub blacklist_duration_secs:  i64,
    pub sites:                    Vec<String>,
    pub log_dir:                  String,
    pub ntfy_topic:               String,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup: &dyn Fn(&str) -> Option<String> = &lookup;
        let text = |key: &str| lookup(key).map(|v| v.trim().to_string()).unwrap_or_default();

        let sites: Vec<String> = text("SITES")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let proxy = text("PROXY_URL");

        Self {
            collection_interval_secs: parsed::<u64>(lookup, "COLLECTION_INTERVAL").unwrap_or(300).max(1),
            prediction_interval_secs: parsed::<u64>(lookup, "PREDICTION_INTERVAL").unwrap_or(300).max(1),
            fetch: FetchConfig {
                timeout_secs:      parsed(lookup, "REQUEST_TIMEOUT_SECS").unwrap_or(10),
                retries:           parsed(lookup, "COLLECTION_RETRIES").unwrap_or(3),
                backoff_base_secs: parsed::<f64>(lookup, "REQUEST_BACKOFF_BASE")
                    .filter(|b| b.is_finite() && *b >= 0.0)
                    .unwrap_or(1.0),
                proxy_url:         (!proxy.is_empty()).then_some(proxy),
                min_request_interval: Duration::from_millis(1250),
            },
            failure_threshold:       parsed(lookup, "SCRAPE_FAILURE_THRESHOLD").unwrap_or(3),
            blacklist_duration_secs: parsed(lookup, "BLACKLIST_DURATION").unwrap_or(3600),
            sites: if sites.is_empty() {
                all_sites().into_iter().map(str::to_string).collect()
            } else {
                sites
            },
            log_dir: Some(text("LOG_DIR")).filter(|d| !d.is_empty()).unwrap_or_else(|| "logs".to_string()),
            ntfy_topic: text("NTFY_TOPIC"),
        }
    }
}

fn parsed<T: FromStr>(lookup: &dyn Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        let env: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[]);
        assert_eq!(s.collection_interval_secs, 300);
        assert_eq!(s.prediction_interval_secs, 300);
        assert_eq!(s.fetch.retries, 3);
        assert_eq!(s.fetch.backoff_base_secs, 1.0);
        assert_eq!(s.fetch.proxy_url, None);
        assert_eq!(s.failure_threshold, 3);
        assert_eq!(s.blacklist_duration_secs, 3600);
        assert_eq!(s.sites.len(), 18);
        assert_eq!(s.log_dir, "logs");
        assert!(s.ntfy_topic.is_empty());
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let s = settings(&[
            ("COLLECTION_INTERVAL", "60"),
            ("COLLECTION_RETRIES", "five"),
            ("REQUEST_BACKOFF_BASE", " 0.5 "),
            ("PROXY_URL", "http://proxy:8080"),
            ("SITES", " BetPawa, https://www.sportybet.com/ng ,,"),
            ("LOG_DIR", "/var/log/odds"),
        ]);
        assert_eq!(s.collection_interval_secs, 60);
        assert_eq!(s.fetch.retries, 3);
        assert_eq!(s.fetch.backoff_base_secs, 0.5);
        assert_eq!(s.fetch.proxy_url.as_deref(), Some("http://proxy:8080"));
        assert_eq!(s.sites, vec!["BetPawa", "https://www.sportybet.com/ng"]);
        assert_eq!(s.log_dir, "/var/log/odds");
    }

    #[test]
    fn test_backoff_base_must_be_finite_and_non_negative() {
        for bad in ["inf", "-inf", "NaN", "-2.5"] {
            let s = settings(&[("REQUEST_BACKOFF_BASE", bad)]);
            assert_eq!(s.fetch.backoff_base_secs, 1.0, "{bad}");
        }
        assert_eq!(settings(&[("REQUEST_BACKOFF_BASE", "1e300")]).fetch.backoff_base_secs, 1e300);
        assert_eq!(settings(&[("REQUEST_BACKOFF_BASE", "0")]).fetch.backoff_base_secs, 0.0);
    }
}
