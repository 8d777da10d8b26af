//! Walks a chain of changes and resolves each one against a reference currency.

use super::changes_errors::ChangesError;
use super::changes_model::{Change, NormalizedChange, Rate, RateResolution, ResolvedChange, Trend};
use super::normalizer::normalize_chain;
use super::rate_table;
use crate::currencies::{Currency, CurrencyCatalog};

/// Looks up the reference currency; an unknown id is fatal for the whole pass.
pub fn lookup_reference<'a>(
    catalog: &'a CurrencyCatalog,
    reference_id: &str,
) -> Result<&'a Currency, ChangesError> {
    catalog
        .find(reference_id)
        .ok_or_else(|| ChangesError::UnknownReferenceCurrency(reference_id.to_string()))
}

pub fn lookup_focus<'a>(
    catalog: &'a CurrencyCatalog,
    focus_id: Option<&str>,
) -> Result<Option<&'a Currency>, ChangesError> {
    focus_id
        .map(|id| {
            catalog
                .find(id)
                .ok_or_else(|| ChangesError::UnknownFocusCurrency(id.to_string()))
        })
        .transpose()
}

/// Picks the currency whose rate against the reference is tracked for a change.
///
/// A focus currency other than the reference overrides the event's own legs.
/// Otherwise the leg that is not the reference is used, `new_currency` when
/// neither leg is. Returns `None` when both legs are the reference.
pub fn counter_currency<'a>(
    change: &'a NormalizedChange,
    reference_id: &str,
    focus: Option<&'a Currency>,
) -> Option<&'a str> {
    if let Some(focus) = focus.filter(|f| f.id != reference_id) {
        return Some(&focus.id);
    }

    let local = change.local_currency.id.as_str();
    let new = change.new_currency.id.as_str();
    match (local == reference_id, new == reference_id) {
        (true, true) => None,
        (true, false) => Some(new),
        (false, true) => Some(local),
        (false, false) => Some(new),
    }
}

/// Resolves rates and trends over a normalized chain.
///
/// The chain is walked newest first. Each resolved rate is compared to the one
/// of the previous (newer) point; an unresolved point clears the baseline, so
/// the next resolved point starts a new trend run without a trend of its own.
/// The output is in presentation order (see [`NormalizedChange::chain_order`]).
pub fn resolve_chain(
    mut changes: Vec<NormalizedChange>,
    reference: &Currency,
    focus: Option<&Currency>,
) -> Vec<ResolvedChange> {
    changes.sort_by(NormalizedChange::chain_order);

    let mut previous: Option<Rate> = None;
    let mut resolved: Vec<ResolvedChange> = changes
        .into_iter()
        .map(|change| {
            let resolution = counter_currency(&change, &reference.id, focus)
                .map(|counter| rate_table::resolve(&change, &reference.id, counter))
                .unwrap_or(RateResolution::Unresolved);

            let trend = match (resolution.rate(), previous) {
                (Some(rate), Some(previous_rate)) => Some(Trend::classify(rate, previous_rate)),
                _ => None,
            };
            previous = resolution.rate();

            ResolvedChange::new(change, resolution, trend)
        })
        .collect();

    resolved.sort_by(ResolvedChange::chain_order);
    resolved
}

/// Keeps the changes touching the focus currency, preserving their order.
pub fn filter_by_focus(list: Vec<ResolvedChange>, focus: Option<&Currency>) -> Vec<ResolvedChange> {
    match focus {
        Some(focus) => list
            .into_iter()
            .filter(|change| change.involves(&focus.id))
            .collect(),
        None => list,
    }
}

/// Normalizes, resolves and filters a raw chain in one call.
pub fn resolve_changes(
    chain: &[Change],
    catalog: &CurrencyCatalog,
    reference_id: &str,
    focus_id: Option<&str>,
) -> Result<Vec<ResolvedChange>, ChangesError> {
    let reference = lookup_reference(catalog, reference_id)?;
    let focus = lookup_focus(catalog, focus_id)?;
    let normalized = normalize_chain(chain, catalog)?;
    let resolved = resolve_chain(normalized, reference, focus);
    Ok(filter_by_focus(resolved, focus))
}
