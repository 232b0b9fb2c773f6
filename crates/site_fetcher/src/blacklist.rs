//! Per-site failure counter with a temporary blacklist.
//!
//! Timestamps are unix seconds supplied by the caller.

use std::collections::HashMap;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteHealth {
    pub fail_count:        u32,
    pub last_failure_ts:   Option<i64>,
    pub blacklisted_until: Option<i64>,
}

pub struct SiteBlacklist {
    threshold:     u32,
    duration_secs: i64,
    sites:         HashMap<String, SiteHealth>,
}

impl SiteBlacklist {
    pub fn new(threshold: u32, duration_secs: i64) -> Self {
        Self {
            threshold: threshold.max(1),
            duration_secs,
            sites: HashMap::new(),
        }
    }

    /// Counts a failed collection. Returns the admin alert text when this
    /// failure puts the site on the blacklist.
    pub fn record_failure(&mut self, site: &str, now: i64) -> Option<String> {
        let entry = self.sites.entry(site.to_string()).or_default();
        entry.fail_count += 1;
        entry.last_failure_ts = Some(now);

        if entry.fail_count < self.threshold {
            return None;
        }

        let until = now + self.duration_secs;
        entry.blacklisted_until = Some(until);
        warn!(site, fails = entry.fail_count, until, "site blacklisted");
        Some(format!(
            "Site {site} added to blacklist after {} failures (until {until}).",
            entry.fail_count
        ))
    }

    pub fn reset_failures(&mut self, site: &str) {
        if let Some(entry) = self.sites.get_mut(site) {
            *entry = SiteHealth::default();
        }
    }

    /// True while the cool-down runs. An expired entry is cleared.
    pub fn is_blacklisted(&mut self, site: &str, now: i64) -> bool {
        let Some(entry) = self.sites.get_mut(site) else {
            return false;
        };
        match entry.blacklisted_until {
            Some(until) if until > now => true,
            Some(_) => {
                info!(site, "blacklist expired");
                entry.blacklisted_until = None;
                entry.fail_count = 0;
                false
            }
            None => false,
        }
    }

    pub fn health(&self, site: &str) -> Option<&SiteHealth> {
        self.sites.get(site)
    }
}
