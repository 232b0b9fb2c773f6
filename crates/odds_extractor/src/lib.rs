//! OddsVector — Odds Extractor
//!
//! Turns a fetched betting page into a deduplicated, descending set of
//! plausible decimal odds.
//!
//! - 1xBet / BetPawa / SportyBet: tiered heuristic (script literals →
//!   odds-bearing elements → whole visible text if still empty)
//! - anything else: visible text + quoted script literals
//!
//! Pure and synchronous. Never fails: empty, absent or broken markup gives an
//! empty set.

pub mod numbers;
pub mod odds;
pub mod page;
pub mod pipeline;
pub mod site;

pub use numbers::{extract_from_script_like, extract_numbers};
pub use odds::{OddsSet, OddsValue, MAX_ODDS, MIN_ODDS};
pub use site::SiteFamily;

use page::Page;
use serde::Serialize;
use tracing::debug;

/// Length of `raw_text_sample`, in characters.
pub const RAW_TEXT_SAMPLE_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub site:            SiteFamily,
    pub odds:            OddsSet,
    /// Diagnostics only, never parsed again.
    pub raw_text_sample: String,
}

impl ExtractionResult {
    pub fn empty() -> Self {
        Self {
            site:            SiteFamily::Generic,
            odds:            OddsSet::new(),
            raw_text_sample: String::new(),
        }
    }
}

/// Extracts odds from an HTML document. Accepts `&str` or `Option<&str>`.
pub fn extract_odds<'a>(html: impl Into<Option<&'a str>>) -> ExtractionResult {
    let Some(html) = html.into() else {
        return ExtractionResult::empty();
    };

    let page = Page::parse(html);
    let site = SiteFamily::detect(&html.to_lowercase(), &page.visible_text.to_lowercase());

    let odds = if site.is_generic() {
        pipeline::run_generic(&page)
    } else {
        pipeline::run_family(&page, site)
    };

    debug!(site = site.name(), odds = odds.len(), html_len = html.len(), "odds extracted");

    ExtractionResult {
        site,
        odds,
        raw_text_sample: page.text_sample(RAW_TEXT_SAMPLE_CHARS),
    }
}
