//! Odds values and the deduplicated set they are collected into.

use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Smallest quoted multiplier that still counts as odds.
pub const MIN_ODDS: f64 = 1.01;
/// Anything above this is page chrome (ids, prices, years with decimals).
pub const MAX_ODDS: f64 = 1000.0;

/// A single decimal odds value, stored in hundredths so equality and
/// ordering are exact after 2-decimal rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OddsValue(u32);

impl OddsValue {
    /// Range-checks the raw value first, then rounds to 2 decimals.
    /// Returns `None` for NaN, infinities and anything outside [1.01, 1000].
    ///
    /// Rounding goes through `{:.2}` formatting, which rounds the exact binary
    /// value and sends exact ties to the even digit: `2.675` is stored as
    /// 2.67499.. and becomes 2.67, `1.125` is a true tie and becomes 1.12.
    pub fn from_raw(raw: f64) -> Option<Self> {
        if !(MIN_ODDS..=MAX_ODDS).contains(&raw) {
            return None;
        }
        format!("{raw:.2}").replace('.', "").parse().ok().map(Self)
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    pub fn hundredths(self) -> u32 {
        self.0
    }
}

impl fmt::Display for OddsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.as_f64())
    }
}

impl Serialize for OddsValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

/// Deduplicated odds. Iteration and serialisation are always descending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OddsSet(BTreeSet<OddsValue>);

impl OddsSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: OddsValue) -> bool {
        self.0.insert(value)
    }

    pub fn union_with(&mut self, other: OddsSet) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, raw: f64) -> bool {
        OddsValue::from_raw(raw).map_or(false, |v| self.0.contains(&v))
    }

    pub fn iter(&self) -> impl Iterator<Item = OddsValue> + '_ {
        self.0.iter().rev().copied()
    }

    /// Plain floats, highest first.
    pub fn values(&self) -> Vec<f64> {
        self.iter().map(OddsValue::as_f64).collect()
    }

    pub fn max(&self) -> Option<OddsValue> {
        self.0.last().copied()
    }

    pub fn min(&self) -> Option<OddsValue> {
        self.0.first().copied()
    }
}

impl FromIterator<OddsValue> for OddsSet {
    fn from_iter<I: IntoIterator<Item = OddsValue>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<OddsValue> for OddsSet {
    fn extend<I: IntoIterator<Item = OddsValue>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl Serialize for OddsSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}
