//! Builds the per-currency inverse-rate series and the set of used currencies.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::changes_model::{Graph, GraphPoint, ResolvedChange};
use super::rate_table::{self, RateSource};
use crate::currencies::{Currency, CurrencyCatalog, CurrencyId};

/// Accumulates chart data over a resolved chain in a single pass.
///
/// Feed it the unfiltered chain: the chart always covers every change, whatever
/// focus currency the list view is restricted to.
pub struct SeriesBuilder<'a> {
    reference_id: &'a str,
    graph: Graph,
    latest: Option<&'a ResolvedChange>,
}

impl<'a> SeriesBuilder<'a> {
    pub fn new(reference_id: &'a str) -> Self {
        Self {
            reference_id,
            graph: Graph::new(),
            latest: None,
        }
    }

    pub fn push(&mut self, change: &'a ResolvedChange) {
        let counters: BTreeSet<&CurrencyId> = change
            .rates()
            .sources()
            .chain(change.second_degree().sources())
            .filter(|id| id.as_str() != self.reference_id)
            .collect();

        for counter in counters {
            let Some(rate) = rate_table::resolve(change, self.reference_id, counter).rate() else {
                continue;
            };
            match rate.inverse() {
                Some(value) => self
                    .graph
                    .entry(counter.clone())
                    .or_default()
                    .push(GraphPoint {
                        date: change.date(),
                        value,
                    }),
                None => log::debug!(
                    "Skipping graph point for {} on change {}: inverse of {} overflows",
                    counter,
                    change.id(),
                    rate
                ),
            }
        }

        let is_newer = self
            .latest
            .map_or(true, |latest| change.chain_order(latest) == Ordering::Less);
        if is_newer {
            self.latest = Some(change);
        }
    }

    /// Returns the graph and the used currencies.
    ///
    /// Used currencies are the catalog entries (in catalog order, reference
    /// excluded) that key the direct snapshot of the most recent change.
    pub fn finish(self, catalog: &CurrencyCatalog) -> (Graph, Vec<Currency>) {
        let used = used_currencies(self.latest, catalog, self.reference_id);
        (self.graph, used)
    }
}

pub fn used_currencies(
    latest: Option<&ResolvedChange>,
    catalog: &CurrencyCatalog,
    reference_id: &str,
) -> Vec<Currency> {
    let Some(latest) = latest else {
        return Vec::new();
    };
    catalog
        .iter()
        .filter(|currency| currency.id != reference_id)
        .filter(|currency| latest.rates().contains_source(&currency.id))
        .cloned()
        .collect()
}

/// Builds the graph and used currencies for a resolved chain.
pub fn build_series(
    list: &[ResolvedChange],
    catalog: &CurrencyCatalog,
    reference_id: &str,
) -> (Graph, Vec<Currency>) {
    let mut builder = SeriesBuilder::new(reference_id);
    for change in list {
        builder.push(change);
    }
    builder.finish(catalog)
}
