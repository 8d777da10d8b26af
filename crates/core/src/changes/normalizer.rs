use super::changes_errors::ChangesError;
use super::changes_model::{Change, NormalizedChange};
use crate::currencies::{Currency, CurrencyCatalog};
use crate::utils::time_utils::parse_change_date;

/// Resolves the currencies of a raw change against the catalog and parses its date.
///
/// A currency id missing from the catalog is an upstream sync inconsistency and
/// is reported rather than skipped.
pub fn normalize(change: &Change, catalog: &CurrencyCatalog) -> Result<NormalizedChange, ChangesError> {
    let local_currency = find_currency(change, &change.local_currency, catalog)?;
    let new_currency = find_currency(change, &change.new_currency, catalog)?;
    let date = parse_change_date(&change.date).ok_or_else(|| ChangesError::InvalidChangeDate {
        change_id: change.id.clone(),
        value: change.date.clone(),
    })?;

    Ok(NormalizedChange {
        id: change.id.clone(),
        name: change.name.clone(),
        date,
        local_currency,
        new_currency,
        rates: change.rates.clone(),
        second_degree: change.second_degree.clone(),
    })
}

/// Normalizes a whole chain, stopping at the first inconsistent change.
pub fn normalize_chain(
    chain: &[Change],
    catalog: &CurrencyCatalog,
) -> Result<Vec<NormalizedChange>, ChangesError> {
    chain
        .iter()
        .map(|change| {
            normalize(change, catalog).inspect_err(|e| {
                log::warn!("Cannot normalize change {}: {}", change.id, e);
            })
        })
        .collect()
}

fn find_currency(
    change: &Change,
    currency_id: &str,
    catalog: &CurrencyCatalog,
) -> Result<Currency, ChangesError> {
    catalog
        .find(currency_id)
        .cloned()
        .ok_or_else(|| ChangesError::CurrencyNotFound {
            change_id: change.id.clone(),
            currency_id: currency_id.to_string(),
        })
}
