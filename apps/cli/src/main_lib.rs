use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context};
use fxchain_core::changes::{Change, ChangesConfig, ChangesService, ChangesServiceTrait, ChangesView};
use fxchain_core::currencies::CurrencyCatalog;
use serde::Deserialize;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Ledger export as produced by the sync collaborator.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainSnapshot {
    pub currencies: CurrencyCatalog,
    #[serde(alias = "chain")]
    pub changes: Vec<Change>,
}

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

pub fn load_snapshot(path: &Path) -> anyhow::Result<ChainSnapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read chain snapshot {}", path.display()))?;
    let snapshot: ChainSnapshot = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse chain snapshot {}", path.display()))?;
    tracing::info!(
        "Loaded {} changes and {} currencies from {}",
        snapshot.changes.len(),
        snapshot.currencies.len(),
        path.display()
    );
    Ok(snapshot)
}

/// Accepts either a catalog id or a currency code (e.g. "EUR").
pub fn resolve_currency_id(catalog: &CurrencyCatalog, value: &str) -> anyhow::Result<String> {
    catalog
        .find(value)
        .or_else(|| catalog.find_by_code(value))
        .map(|currency| currency.id.clone())
        .ok_or_else(|| anyhow!("Unknown currency '{}'", value))
}

pub fn build_view(config: &Config, snapshot: &ChainSnapshot) -> anyhow::Result<Arc<ChangesView>> {
    let reference_id = resolve_currency_id(&snapshot.currencies, &config.reference)?;
    let focus_id = config
        .focus
        .as_deref()
        .map(|focus| resolve_currency_id(&snapshot.currencies, focus))
        .transpose()?;

    let service = ChangesService::new(ChangesConfig::default());
    let view = service.get_changes_view(
        &snapshot.changes,
        &snapshot.currencies,
        &reference_id,
        focus_id.as_deref(),
    )?;
    tracing::info!(
        "Resolved {} changes, {} series, {} used currencies",
        view.list.len(),
        view.graph.len(),
        view.used_currencies.len()
    );
    Ok(view)
}

/// Loads the snapshot, builds the view and renders it as JSON.
pub fn run(config: &Config) -> anyhow::Result<String> {
    let snapshot = load_snapshot(&config.input_path)?;
    let view = build_view(config, &snapshot)?;
    let rendered = if config.pretty {
        serde_json::to_string_pretty(view.as_ref())?
    } else {
        serde_json::to_string(view.as_ref())?
    };
    Ok(rendered)
}
