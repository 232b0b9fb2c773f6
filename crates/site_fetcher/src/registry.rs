//! Known operators and the domains they are served from.

/// Ordered: URL identification returns the first hit.
pub const SITE_PATTERNS: &[(&str, &[&str])] = &[
    ("1xBet",        &["1xbet.com", "1xbet.kz"]),
    ("Bet365",       &["bet365.com"]),
    ("BetWay",       &["betway.com"]),
    ("Betika",       &["betika.com"]),
    ("BetPawa",      &["betpawa.com"]),
    ("SportyBet",    &["sportybet.com"]),
    ("MelBet",       &["melbet.com"]),
    ("1Win",         &["1win.com"]),
    ("MeridianBet",  &["meridianbet.com"]),
    ("SpinCity",     &["spincity.bet"]),
    ("Bet9ja",       &["bet9ja.com"]),
    ("Unibet",       &["unibet.com"]),
    ("William Hill", &["williamhill.com"]),
    ("Betclic",      &["betclic.com"]),
    ("Parimatch",    &["parimatch.com"]),
    ("Betsafe",      &["betsafe.com"]),
    ("Betfred",      &["betfred.com"]),
    ("MozzartBet",   &["mozzartbet.com"]),
];

pub fn identify_site_from_url(url: &str) -> Option<&'static str> {
    SITE_PATTERNS
        .iter()
        .find(|(_, domains)| domains.iter().any(|d| url.contains(d)))
        .map(|(site, _)| *site)
}

/// Home page of a known site name (exact match).
pub fn home_url(site: &str) -> Option<String> {
    SITE_PATTERNS
        .iter()
        .find(|(name, _)| *name == site)
        .and_then(|(_, domains)| domains.first())
        .map(|domain| format!("https://{domain}"))
}

pub fn all_sites() -> Vec<&'static str> {
    SITE_PATTERNS.iter().map(|(name, _)| *name).collect()
}
