//! Site families with a dedicated heuristic, and how to recognise them.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SiteFamily {
    #[serde(rename = "1xBet")]
    OneXBet,
    #[serde(rename = "BetPawa")]
    BetPawa,
    #[serde(rename = "SportyBet")]
    SportyBet,
    #[serde(rename = "generic")]
    Generic,
}

/// Detection order. First marker found wins.
const FAMILY_MARKERS: [(&str, SiteFamily); 3] = [
    ("1xbet", SiteFamily::OneXBet),
    ("betpawa", SiteFamily::BetPawa),
    ("sportybet", SiteFamily::SportyBet),
];

impl SiteFamily {
    /// Picks the family from already-lowercased markup and visible text.
    pub fn detect(lower_html: &str, lower_text: &str) -> Self {
        FAMILY_MARKERS
            .iter()
            .find(|(marker, _)| lower_html.contains(marker) || lower_text.contains(marker))
            .map(|(_, family)| *family)
            .unwrap_or(SiteFamily::Generic)
    }

    pub fn name(self) -> &'static str {
        match self {
            SiteFamily::OneXBet => "1xBet",
            SiteFamily::BetPawa => "BetPawa",
            SiteFamily::SportyBet => "SportyBet",
            SiteFamily::Generic => "generic",
        }
    }

    /// Attributes whose value is the odds itself, in order of preference.
    pub fn odds_attributes(self) -> &'static [&'static str] {
        match self {
            SiteFamily::OneXBet => &["data-coef", "data-odds"],
            SiteFamily::BetPawa => &["data-price", "data-odd", "data-odds"],
            SiteFamily::SportyBet => &["data-price"],
            SiteFamily::Generic => &[],
        }
    }

    /// Lowercase fragments matched against the element's `class` attribute.
    pub fn class_fragments(self) -> &'static [&'static str] {
        match self {
            SiteFamily::OneXBet => &["coef", "odds", "price"],
            SiteFamily::BetPawa => &["odd", "price", "coef"],
            SiteFamily::SportyBet => &["odds", "coefficient"],
            SiteFamily::Generic => &[],
        }
    }

    pub fn is_generic(self) -> bool {
        self == SiteFamily::Generic
    }
}
