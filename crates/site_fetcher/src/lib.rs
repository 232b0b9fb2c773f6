//! OddsVector — Site Fetcher
//!
//! Pulls betting pages over HTTP and hands them to the odds extractor.
//! Retries with exponential backoff, paces requests through a rate limiter,
//! and tracks failing sites for a temporary blacklist.

pub mod blacklist;
pub mod registry;

pub use blacklist::{SiteBlacklist, SiteHealth};
pub use registry::{all_sites, home_url, identify_site_from_url, SITE_PATTERNS};

use anyhow::{Context, Result};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use odds_extractor::{extract_odds, OddsSet};
use serde::Serialize;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0 Safari/537.36";

/// Error tag reported when a page could not be fetched at all.
pub const FAILED_FETCH: &str = "failed_fetch";

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout_secs:        u64,
    /// Retries after the first attempt.
    pub retries:             u32,
    pub backoff_base_secs:   f64,
    pub proxy_url:           Option<String>,
    pub min_request_interval: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs:         10,
            retries:              3,
            backoff_base_secs:    1.0,
            proxy_url:            None,
            min_request_interval: Duration::from_millis(1250),
        }
    }
}

/// Latest odds for a site name or URL. `error` is set only when the page
/// could not be fetched; an empty `odds` with no error is a valid result.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LatestOdds {
    pub site:  Option<String>,
    pub odds:  OddsSet,
    pub raw:   Option<String>,
    pub error: Option<String>,
}

impl LatestOdds {
    fn failed(site: Option<String>) -> Self {
        Self {
            site,
            error: Some(FAILED_FETCH.to_string()),
            ..Self::default()
        }
    }
}

/// What a `site_or_url` argument points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Nothing,
    Url { site: String, url: String },
    KnownSite { site: String, url: String },
    UnknownSite(String),
}

impl Target {
    pub fn resolve(site_or_url: Option<&str>) -> Self {
        let Some(input) = site_or_url.map(str::trim).filter(|s| !s.is_empty()) else {
            return Target::Nothing;
        };

        if input.starts_with("http") {
            let site = identify_site_from_url(input).unwrap_or(input).to_string();
            return Target::Url { site, url: input.to_string() };
        }

        match home_url(input) {
            Some(url) => Target::KnownSite { site: input.to_string(), url },
            None => Target::UnknownSite(input.to_string()),
        }
    }
}

/// `base * 2^(attempt-1)` for attempt >= 1. NaN or negative gives zero,
/// anything too large for a `Duration` saturates.
pub fn backoff_delay(base_secs: f64, attempt: u32) -> Duration {
    let exp = attempt.saturating_sub(1).min(16);
    let secs = base_secs * f64::from(1u32 << exp);
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

pub struct SiteFetcher {
    client:            reqwest::Client,
    limiter:           DefaultDirectRateLimiter,
    retries:           u32,
    backoff_base_secs: f64,
}

impl SiteFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true);

        if let Some(proxy) = config.proxy_url.as_deref().filter(|p| !p.is_empty()) {
            builder = builder.proxy(reqwest::Proxy::all(proxy).context("invalid PROXY_URL")?);
        }

        let quota = Quota::with_period(config.min_request_interval)
            .unwrap_or_else(|| Quota::per_second(std::num::NonZeroU32::MIN));

        Ok(Self {
            client:            builder.build().context("failed to build HTTP client")?,
            limiter:           RateLimiter::direct(quota),
            retries:           config.retries,
            backoff_base_secs: config.backoff_base_secs,
        })
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        self.limiter.until_ready().await;

        let resp = self.client.get(url)
            .send()
            .await
            .with_context(|| format!("request failed for {url}"))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!("HTTP {status} for {url}"));
        }

        Ok(resp.text().await?)
    }

    /// Page body, or `None` after the last retry failed.
    pub async fn fetch_html(&self, url: &str) -> Option<String> {
        let mut attempt = 0u32;
        loop {
            match self.fetch_once(url).await {
                Ok(html) => {
                    debug!(url, attempt, html_len = html.len(), "fetched");
                    return Some(html);
                }
                Err(e) => {
                    attempt += 1;
                    if attempt > self.retries {
                        warn!(url, attempts = attempt, "giving up: {e:#}");
                        return None;
                    }
                    let wait = backoff_delay(self.backoff_base_secs, attempt);
                    warn!(url, attempt, retries = self.retries, "fetch failed: {e:#}, retrying in {:.1}s", wait.as_secs_f64());
                    sleep(wait).await;
                }
            }
        }
    }

    pub async fn get_site_odds_by_url(&self, url: &str) -> LatestOdds {
        let Some(html) = self.fetch_html(url).await else {
            return LatestOdds::failed(None);
        };
        let extracted = extract_odds(html.as_str());
        LatestOdds {
            site:  None,
            odds:  extracted.odds,
            raw:   Some(extracted.raw_text_sample),
            error: None,
        }
    }

    /// Latest odds for a site name (fetches its home page) or a URL.
    pub async fn get_latest_odds(&self, site_or_url: Option<&str>) -> LatestOdds {
        let (site, url) = match Target::resolve(site_or_url) {
            Target::Nothing => return LatestOdds::default(),
            Target::UnknownSite(site) => {
                info!(site = %site, "no known home page, skipping fetch");
                return LatestOdds { site: Some(site), ..LatestOdds::default() };
            }
            Target::Url { site, url } | Target::KnownSite { site, url } => (site, url),
        };

        let mut res = self.get_site_odds_by_url(&url).await;
        res.site = Some(site);
        res
    }
}
