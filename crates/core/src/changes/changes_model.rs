use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::currencies::{deserialize_id, Currency, CurrencyId};

// =============================================================================
// Rates
// =============================================================================

/// A strictly positive exchange rate.
///
/// Zero and negative values never make it into a `Rate`: a stored zero is
/// treated exactly like a missing snapshot entry.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Rate(Decimal);

impl Rate {
    pub fn new(value: Decimal) -> Option<Self> {
        if value > Decimal::ZERO {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns `1 / rate`, or `None` if the division overflows.
    pub fn inverse(&self) -> Option<Decimal> {
        Decimal::ONE.checked_div(self.0)
    }
}

impl TryFrom<Decimal> for Rate {
    type Error = String;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Rate::new(value).ok_or_else(|| format!("exchange rate must be positive, got {}", value))
    }
}

impl From<Rate> for Decimal {
    fn from(rate: Rate) -> Self {
        rate.0
    }
}

impl std::fmt::Display for Rate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rates known at the time of a change: source currency -> target currency -> rate.
///
/// Values are kept as stored. A `null` entry is an explicit absence; zero and
/// negative entries are filtered out by [`RateSnapshot::get`].
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct RateSnapshot(BTreeMap<CurrencyId, BTreeMap<CurrencyId, Option<Decimal>>>);

impl RateSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>, rate: Decimal) {
        self.0
            .entry(from.into())
            .or_default()
            .insert(to.into(), Some(rate));
    }

    /// Builder-style variant of [`RateSnapshot::insert`].
    pub fn with_rate(mut self, from: impl Into<String>, to: impl Into<String>, rate: Decimal) -> Self {
        self.insert(from, to, rate);
        self
    }

    /// Returns the rate from `from` to `to` if it is present and positive.
    pub fn get(&self, from: &str, to: &str) -> Option<Rate> {
        self.0
            .get(from)
            .and_then(|targets| targets.get(to))
            .and_then(|value| value.and_then(Rate::new))
    }

    /// Every stored entry as `(from, to, value)`, in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&CurrencyId, &CurrencyId, Option<Decimal>)> {
        self.0
            .iter()
            .flat_map(|(from, targets)| targets.iter().map(move |(to, value)| (from, to, *value)))
    }

    /// Source currencies that have an entry in this snapshot.
    pub fn sources(&self) -> impl Iterator<Item = &CurrencyId> {
        self.0.keys()
    }

    pub fn contains_source(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Outcome of looking up a rate in one change's snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateResolution {
    /// Found in the direct-rate snapshot.
    Direct(Rate),
    /// Found only through one intermediate currency.
    SecondDegree(Rate),
    Unresolved,
}

impl RateResolution {
    pub fn rate(&self) -> Option<Rate> {
        match self {
            RateResolution::Direct(rate) | RateResolution::SecondDegree(rate) => Some(*rate),
            RateResolution::Unresolved => None,
        }
    }

    /// `Some(true)` for direct rates, `Some(false)` for second-degree ones.
    pub fn accurate(&self) -> Option<bool> {
        match self {
            RateResolution::Direct(_) => Some(true),
            RateResolution::SecondDegree(_) => Some(false),
            RateResolution::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, RateResolution::Unresolved)
    }
}

// =============================================================================
// Changes
// =============================================================================

/// A raw currency exchange event, as delivered by the sync collaborator.
///
/// The engine never mutates a `Change`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub date: String,
    #[serde(alias = "local_currency", deserialize_with = "deserialize_id")]
    pub local_currency: CurrencyId,
    #[serde(alias = "new_currency", deserialize_with = "deserialize_id")]
    pub new_currency: CurrencyId,
    #[serde(default)]
    pub rates: RateSnapshot,
    #[serde(default, alias = "second_degree")]
    pub second_degree: RateSnapshot,
}

impl Change {
    /// Template for recording the same exchange again: everything but the id and date.
    pub fn duplicate(&self) -> NewChange {
        NewChange {
            name: self.name.clone(),
            local_currency: self.local_currency.clone(),
            new_currency: self.new_currency.clone(),
            rates: self.rates.clone(),
            second_degree: self.second_degree.clone(),
        }
    }
}

/// A change that has not been stored yet (no id, no date).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub local_currency: CurrencyId,
    pub new_currency: CurrencyId,
    #[serde(default)]
    pub rates: RateSnapshot,
    #[serde(default)]
    pub second_degree: RateSnapshot,
}

/// A change with its currencies resolved against the catalog and its date parsed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedChange {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub date: DateTime<Utc>,
    pub local_currency: Currency,
    pub new_currency: Currency,
    pub rates: RateSnapshot,
    pub second_degree: RateSnapshot,
}

impl NormalizedChange {
    pub fn involves(&self, currency_id: &str) -> bool {
        self.local_currency.id == currency_id || self.new_currency.id == currency_id
    }

    /// Presentation order: newest first, then descending local currency name,
    /// new currency name, change name (unnamed last) and change id. The id key
    /// makes the order total.
    pub fn chain_order(&self, other: &Self) -> Ordering {
        other
            .date
            .cmp(&self.date)
            .then_with(|| other.local_currency.name.cmp(&self.local_currency.name))
            .then_with(|| other.new_currency.name.cmp(&self.new_currency.name))
            .then_with(|| other.name.cmp(&self.name))
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Direction of a resolved rate relative to the previous resolved point.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    /// A lower rate than the previous point is `Up`, a higher one `Down`.
    pub fn classify(rate: Rate, previous: Rate) -> Self {
        match rate.cmp(&previous) {
            Ordering::Less => Trend::Up,
            Ordering::Greater => Trend::Down,
            Ordering::Equal => Trend::Flat,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Flat => "flat",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized change with its rate against the selected reference currency.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedChange {
    #[serde(flatten)]
    pub change: NormalizedChange,
    pub rate: Option<Rate>,
    pub accurate: Option<bool>,
    pub trend: Option<Trend>,
}

impl ResolvedChange {
    pub fn new(change: NormalizedChange, resolution: RateResolution, trend: Option<Trend>) -> Self {
        Self {
            change,
            rate: resolution.rate(),
            accurate: resolution.accurate(),
            trend,
        }
    }

    pub fn id(&self) -> &str {
        &self.change.id
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.change.date
    }

    pub fn involves(&self, currency_id: &str) -> bool {
        self.change.involves(currency_id)
    }

    pub fn chain_order(&self, other: &Self) -> Ordering {
        self.change.chain_order(&other.change)
    }
}

// =============================================================================
// Series
// =============================================================================

/// One point of an inverse-rate series.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GraphPoint {
    pub date: DateTime<Utc>,
    pub value: Decimal,
}

/// Counter currency id -> inverse-rate series, in list order.
pub type Graph = BTreeMap<CurrencyId, Vec<GraphPoint>>;

/// The read model handed to the presentation layer.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChangesView {
    pub list: Vec<ResolvedChange>,
    pub graph: Graph,
    pub used_currencies: Vec<Currency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<Currency>,
}

impl ChangesView {
    /// True when no currency has a currently known rate.
    pub fn is_empty(&self) -> bool {
        self.used_currencies.is_empty()
    }

    pub fn series(&self, currency_id: &str) -> &[GraphPoint] {
        self.graph.get(currency_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Tunables for building the changes view.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangesConfig {
    /// Maximum number of memoized views kept by `ChangesService` (default: 32, 0 disables)
    pub cache_capacity: usize,
}

impl Default for ChangesConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 32,
        }
    }
}
