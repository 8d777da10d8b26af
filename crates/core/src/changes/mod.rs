//! Changes module - exchange rate resolution and history over a chain of
//! currency exchange events.
//!
//! Data flows leaf-first: the rate table answers single-change lookups, the
//! normalizer attaches catalog currencies and parsed dates, the chain resolver
//! computes rates and trends against a reference currency, the series builder
//! produces chart data, and the service exposes the final view.

mod chain_resolver;
mod changes_errors;
mod changes_model;
mod changes_service;
mod changes_traits;
mod normalizer;
mod rate_table;
mod series_builder;

pub use chain_resolver::{
    counter_currency, filter_by_focus, lookup_focus, lookup_reference, resolve_chain,
    resolve_changes,
};
pub use changes_errors::ChangesError;
pub use changes_model::{
    Change, ChangesConfig, ChangesView, Graph, GraphPoint, NewChange, NormalizedChange, Rate,
    RateResolution, RateSnapshot, ResolvedChange, Trend,
};
pub use changes_service::{compute_inputs_hash, process_changes, ChangesService};
pub use changes_traits::ChangesServiceTrait;
pub use normalizer::{normalize, normalize_chain};
pub use rate_table::{resolve, RateSource};
pub use series_builder::{build_series, used_currencies, SeriesBuilder};


#[cfg(test)]
mod changes_service_tests;
