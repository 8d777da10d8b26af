//! Tests for the changes view facade and its memoizing service.

use super::*;
use crate::currencies::{Currency, CurrencyCatalog};
use crate::errors::Error;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

fn catalog() -> CurrencyCatalog {
    CurrencyCatalog::new(vec![
        Currency::new("1", "US Dollar", "USD"),
        Currency::new("2", "Euro", "EUR"),
        Currency::new("3", "Pound Sterling", "GBP"),
    ])
}

/// Full-matrix snapshot as produced by the sync collaborator.
fn snapshot(usd_eur: Decimal, usd_gbp: Decimal) -> RateSnapshot {
    RateSnapshot::new()
        .with_rate("1", "2", usd_eur)
        .with_rate("1", "3", usd_gbp)
        .with_rate("2", "1", Decimal::ONE / usd_eur)
        .with_rate("3", "1", Decimal::ONE / usd_gbp)
}

fn change(id: &str, date: &str, local: &str, new: &str, rates: RateSnapshot) -> Change {
    Change {
        id: id.to_string(),
        name: None,
        date: date.to_string(),
        local_currency: local.to_string(),
        new_currency: new.to_string(),
        rates,
        second_degree: RateSnapshot::new(),
    }
}

fn chain() -> Vec<Change> {
    vec![
        change("a", "2024-01-01", "1", "2", snapshot(dec!(0.8), dec!(0.5))),
        change("b", "2024-02-01", "1", "3", snapshot(dec!(0.5), dec!(0.4))),
        change("c", "2024-03-01", "2", "1", snapshot(dec!(1), dec!(0.5))),
    ]
}

#[test]
fn test_process_changes_builds_full_view() {
    let view =
        process_changes(&chain(), &catalog(), "1", None).unwrap();

    let ids: Vec<&str> = view.list.iter().map(|c| c.id()).collect();
    assert_eq!(ids, vec!["c", "b", "a"]);

    let rates: Vec<Option<Decimal>> = view.list.iter().map(|c| c.rate.map(|r| r.value())).collect();
    assert_eq!(rates, vec![Some(dec!(1)), Some(dec!(0.4)), Some(dec!(0.8))]);
    let trends: Vec<Option<Trend>> = view.list.iter().map(|c| c.trend).collect();
    assert_eq!(trends, vec![None, Some(Trend::Up), Some(Trend::Down)]);

    assert!(!view.graph.contains_key("1"));
    let eur: Vec<Decimal> = view.series("2").iter().map(|p| p.value).collect();
    assert_eq!(eur, vec![dec!(1), dec!(2), dec!(1.25)]);
    let gbp: Vec<Decimal> = view.series("3").iter().map(|p| p.value).collect();
    assert_eq!(gbp, vec![dec!(2), dec!(2.5), dec!(2)]);

    let codes: Vec<&str> = view.used_currencies.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, vec!["EUR", "GBP"]);
    assert!(view.focus.is_none());
    assert!(!view.is_empty());
}

#[test]
fn test_focus_filters_list_but_not_graph() {
    let all = process_changes(&chain(), &catalog(), "1", None).unwrap();
    let focused = process_changes(&chain(), &catalog(), "1", Some("3")).unwrap();

    let ids: Vec<&str> = focused.list.iter().map(|c| c.id()).collect();
    assert_eq!(ids, vec!["b"]);
    assert_eq!(focused.graph, all.graph);
    assert_eq!(focused.used_currencies, all.used_currencies);
    assert_eq!(focused.focus.as_ref().map(|c| c.name.as_str()), Some("Pound Sterling"));
}

#[test]
fn test_empty_chain_gives_empty_view() {
    let view = process_changes(&[], &catalog(), "1", None).unwrap();
    assert!(view.list.is_empty());
    assert!(view.graph.is_empty());
    assert!(view.is_empty());
}

#[test]
fn test_unknown_reference_propagates() {
    let err = process_changes(&chain(), &catalog(), "99", None)
        .unwrap_err();
    assert!(err.is_catalog_inconsistency());
    assert!(matches!(err, Error::Changes(_)));
}

#[test]
fn test_view_serializes_for_the_ui() {
    let view = process_changes(&chain(), &catalog(), "1", Some("2"))
        .unwrap();
    let json = serde_json::to_value(&view).unwrap();

    assert!(json["list"].is_array());
    assert!(json["usedCurrencies"].is_array());
    assert!(json["graph"]["2"].is_array());
    let first = &json["list"][0];
    assert_eq!(first["id"], "c");
    assert_eq!(first["localCurrency"]["code"], "EUR");
    assert_eq!(first["accurate"], true);
    assert!(first["trend"].is_null());
    assert_eq!(json["focus"]["code"], "EUR");
}

#[test]
fn test_duplicate_drops_id_and_date() {
    let mut original = chain().remove(0);
    original.name = Some("Bureau de change".to_string());
    let template = original.duplicate();

    assert_eq!(template.name, original.name);
    assert_eq!(template.local_currency, "1");
    assert_eq!(template.new_currency, "2");
    assert_eq!(template.rates, original.rates);
    let json = serde_json::to_value(&template).unwrap();
    assert!(json.get("id").is_none());
    assert!(json.get("date").is_none());
}

// =========================================================================
// Memoization
// =========================================================================

#[test]
fn test_service_memoizes_identical_inputs() {
    let service = ChangesService::default();
    let chain = chain();
    let catalog = catalog();

    let first = service.get_changes_view(&chain, &catalog, "1", None).unwrap();
    let second = service.get_changes_view(&chain, &catalog, "1", None).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(service.cached_views().unwrap(), 1);

    let focused = service.get_changes_view(&chain, &catalog, "1", Some("2")).unwrap();
    assert!(!Arc::ptr_eq(&first, &focused));
    assert_eq!(service.cached_views().unwrap(), 2);
}

#[test]
fn test_service_recomputes_when_chain_changes() {
    let service = ChangesService::default();
    let catalog = catalog();
    let mut chain = chain();

    let before = service.get_changes_view(&chain, &catalog, "1", None).unwrap();
    chain[0].rates.insert("1", "2", dec!(0.7));
    let after = service.get_changes_view(&chain, &catalog, "1", None).unwrap();

    assert!(!Arc::ptr_eq(&before, &after));
    assert_ne!(before.list, after.list);
}

#[test]
fn test_service_tells_apart_rates_beyond_float_precision() {
    let service = ChangesService::default();
    let catalog = catalog();
    let mut chain = chain();

    chain[0].rates.insert("1", "2", dec!(0.12345678901234567890));
    let before = service.get_changes_view(&chain, &catalog, "1", None).unwrap();
    chain[0].rates.insert("1", "2", dec!(0.12345678901234567899));
    let after = service.get_changes_view(&chain, &catalog, "1", None).unwrap();

    let rate_of_a = |view: &ChangesView| {
        view.list
            .iter()
            .find(|c| c.id() == "a")
            .and_then(|c| c.rate)
            .map(|r| r.value())
    };
    assert_eq!(rate_of_a(&before), Some(dec!(0.12345678901234567890)));
    assert_eq!(rate_of_a(&after), Some(dec!(0.12345678901234567899)));
    assert_eq!(*after, process_changes(&chain, &catalog, "1", None).unwrap());
    assert_eq!(service.cached_views().unwrap(), 2);
}

#[test]
fn test_invalidate_and_capacity() {
    let service = ChangesService::new(ChangesConfig { cache_capacity: 2 });
    let chain = chain();
    let catalog = catalog();

    service.get_changes_view(&chain, &catalog, "1", None).unwrap();
    service.get_changes_view(&chain, &catalog, "2", None).unwrap();
    assert_eq!(service.cached_views().unwrap(), 2);
    service.get_changes_view(&chain, &catalog, "3", None).unwrap();
    assert_eq!(service.cached_views().unwrap(), 1);

    service.invalidate().unwrap();
    assert_eq!(service.cached_views().unwrap(), 0);
}

#[test]
fn test_zero_capacity_disables_memoization() {
    let service = ChangesService::new(ChangesConfig { cache_capacity: 0 });
    let chain = chain();
    let catalog = catalog();

    let first = service.get_changes_view(&chain, &catalog, "1", None).unwrap();
    let second = service.get_changes_view(&chain, &catalog, "1", None).unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first, second);
    assert_eq!(service.cached_views().unwrap(), 0);
}

#[test]
fn test_inputs_hash_is_stable_and_sensitive() {
    let a = compute_inputs_hash(&chain(), &catalog(), "1", None).unwrap();
    let b = compute_inputs_hash(&chain(), &catalog(), "1", None).unwrap();
    let c = compute_inputs_hash(&chain(), &catalog(), "1", Some("2")).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.len(), 64);
}
