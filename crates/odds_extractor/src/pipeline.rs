//! Heuristic tiers for the known site families, plus the generic fallback.
//!
//! A family heuristic runs the tiers in `Tier::ORDERED` over one accumulating
//! set. Script and structural tiers always run; the visible-text tier only
//! runs when the first two found nothing.

use crate::numbers::{extract_from_script_like, extract_numbers};
use crate::odds::OddsSet;
use crate::page::{element_text, Page};
use crate::site::SiteFamily;
use scraper::ElementRef;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Quoted decimal literals anywhere in the raw markup.
    ScriptLiterals,
    /// Elements carrying the family's odds attributes or class fragments.
    Structural,
    /// Whole visible text. Last resort.
    VisibleText,
}

impl Tier {
    pub const ORDERED: [Tier; 3] = [Tier::ScriptLiterals, Tier::Structural, Tier::VisibleText];

    /// Whether this tier runs given what the earlier tiers collected.
    pub fn should_run(self, collected: &OddsSet) -> bool {
        match self {
            Tier::ScriptLiterals | Tier::Structural => true,
            Tier::VisibleText => collected.is_empty(),
        }
    }

    pub fn collect(self, page: &Page<'_>, family: SiteFamily) -> OddsSet {
        match self {
            Tier::ScriptLiterals => extract_from_script_like(page.html),
            Tier::Structural => structural_scan(page, family),
            Tier::VisibleText => extract_numbers(&page.visible_text),
        }
    }
}

/// Runs the tier pipeline for a known family.
pub fn run_family(page: &Page<'_>, family: SiteFamily) -> OddsSet {
    let mut odds = OddsSet::new();
    for tier in Tier::ORDERED {
        if !tier.should_run(&odds) {
            debug!(site = family.name(), ?tier, "tier skipped");
            continue;
        }
        let found = tier.collect(page, family);
        debug!(site = family.name(), ?tier, found = found.len(), "tier done");
        odds.union_with(found);
    }
    odds
}

/// No family matched: visible text plus quoted script literals.
pub fn run_generic(page: &Page<'_>) -> OddsSet {
    let mut odds = extract_numbers(&page.visible_text);
    odds.union_with(extract_from_script_like(page.html));
    odds
}

fn structural_scan(page: &Page<'_>, family: SiteFamily) -> OddsSet {
    let mut odds = OddsSet::new();
    for element in page.elements() {
        if let Some(candidate) = structural_candidate(&element, family) {
            odds.union_with(extract_numbers(&candidate));
        }
    }
    odds
}

/// The string to scan for an element that looks odds-bearing, or `None`
/// when it matches none of the family's patterns.
fn structural_candidate(element: &ElementRef<'_>, family: SiteFamily) -> Option<String> {
    let el = element.value();
    let has_attr = family.odds_attributes().iter().any(|name| el.attr(name).is_some());
    let class_hit = el
        .attr("class")
        .map(|class| {
            let class = class.to_lowercase();
            family.class_fragments().iter().any(|frag| class.contains(frag))
        })
        .unwrap_or(false);

    if !has_attr && !class_hit {
        return None;
    }

    // Attribute value wins over text; empty attributes do not count.
    let attr_value = family
        .odds_attributes()
        .iter()
        .filter_map(|name| el.attr(name))
        .map(str::trim)
        .find(|v| !v.is_empty());

    Some(match attr_value {
        Some(v) => v.to_string(),
        None => element_text(element),
    })
}
