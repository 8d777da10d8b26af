use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use sha2::{Digest, Sha256};

use super::chain_resolver::{filter_by_focus, lookup_focus, lookup_reference, resolve_chain};
use super::changes_errors::ChangesError;
use super::changes_model::{Change, ChangesConfig, ChangesView, RateSnapshot};
use super::changes_traits::ChangesServiceTrait;
use super::normalizer::normalize_chain;
use super::series_builder::build_series;
use crate::currencies::CurrencyCatalog;
use crate::errors::Result;

/// Builds the read model consumed by the presentation layer.
///
/// Pure function of its inputs: the chain is normalized, resolved against the
/// reference currency, turned into chart series (always over the whole chain)
/// and finally restricted to the focus currency if one is given.
pub fn process_changes(
    chain: &[Change],
    catalog: &CurrencyCatalog,
    reference_id: &str,
    focus_id: Option<&str>,
) -> Result<ChangesView> {
    let reference = lookup_reference(catalog, reference_id)?;
    let focus = lookup_focus(catalog, focus_id)?;

    let normalized = normalize_chain(chain, catalog)?;
    let resolved = resolve_chain(normalized, reference, focus);
    let (graph, used_currencies) = build_series(&resolved, catalog, &reference.id);
    let list = filter_by_focus(resolved, focus);

    log::debug!(
        "Processed {} changes against {}: {} listed, {} series, {} used currencies",
        chain.len(),
        reference.code,
        list.len(),
        graph.len(),
        used_currencies.len()
    );

    Ok(ChangesView {
        list,
        graph,
        used_currencies,
        focus: focus.cloned(),
    })
}

/// Snapshot entry with its rate as exact decimal text. Rates serialize as
/// floats elsewhere, which would merge values that differ past `f64` precision.
type FingerprintRate<'a> = (&'a str, &'a str, Option<String>);

#[derive(Serialize)]
struct FingerprintChange<'a> {
    id: &'a str,
    name: Option<&'a str>,
    date: &'a str,
    local_currency: &'a str,
    new_currency: &'a str,
    rates: Vec<FingerprintRate<'a>>,
    second_degree: Vec<FingerprintRate<'a>>,
}

impl<'a> FingerprintChange<'a> {
    fn new(change: &'a Change) -> Self {
        Self {
            id: &change.id,
            name: change.name.as_deref(),
            date: &change.date,
            local_currency: &change.local_currency,
            new_currency: &change.new_currency,
            rates: fingerprint_rates(&change.rates),
            second_degree: fingerprint_rates(&change.second_degree),
        }
    }
}

fn fingerprint_rates(snapshot: &RateSnapshot) -> Vec<FingerprintRate<'_>> {
    snapshot
        .entries()
        .map(|(from, to, value)| (from.as_str(), to.as_str(), value.map(|v| v.to_string())))
        .collect()
}

#[derive(Serialize)]
struct FingerprintInput<'a> {
    chain: Vec<FingerprintChange<'a>>,
    catalog: &'a CurrencyCatalog,
    reference_id: &'a str,
    focus_id: Option<&'a str>,
}

/// Computes a stable SHA-256 fingerprint of the inputs of [`process_changes`].
pub fn compute_inputs_hash(
    chain: &[Change],
    catalog: &CurrencyCatalog,
    reference_id: &str,
    focus_id: Option<&str>,
) -> Result<String> {
    let payload = serde_json::to_vec(&FingerprintInput {
        chain: chain.iter().map(FingerprintChange::new).collect(),
        catalog,
        reference_id,
        focus_id,
    })?;
    Ok(hex::encode(Sha256::digest(&payload)))
}

/// Memoizing front of [`process_changes`].
///
/// Views are shared as `Arc<ChangesView>` and keyed by the fingerprint of the
/// inputs, so a caller can re-request the view on every state change and only
/// pay for the resolution when something actually changed.
#[derive(Clone)]
pub struct ChangesService {
    config: ChangesConfig,
    cache: Arc<RwLock<HashMap<String, Arc<ChangesView>>>>,
}

impl ChangesService {
    pub fn new(config: ChangesConfig) -> Self {
        Self {
            config,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &ChangesConfig {
        &self.config
    }

    /// Number of memoized views.
    pub fn cached_views(&self) -> Result<usize> {
        let cache = self
            .cache
            .read()
            .map_err(|e| ChangesError::CacheError(e.to_string()))?;
        Ok(cache.len())
    }

    fn lookup(&self, key: &str) -> Result<Option<Arc<ChangesView>>> {
        let cache = self
            .cache
            .read()
            .map_err(|e| ChangesError::CacheError(e.to_string()))?;
        Ok(cache.get(key).cloned())
    }

    fn store(&self, key: String, view: Arc<ChangesView>) -> Result<()> {
        let mut cache = self
            .cache
            .write()
            .map_err(|e| ChangesError::CacheError(e.to_string()))?;
        if cache.len() >= self.config.cache_capacity {
            log::debug!("Changes view cache full ({} entries), clearing", cache.len());
            cache.clear();
        }
        cache.insert(key, view);
        Ok(())
    }
}

impl Default for ChangesService {
    fn default() -> Self {
        Self::new(ChangesConfig::default())
    }
}

impl ChangesServiceTrait for ChangesService {
    fn get_changes_view(
        &self,
        chain: &[Change],
        catalog: &CurrencyCatalog,
        reference_id: &str,
        focus_id: Option<&str>,
    ) -> Result<Arc<ChangesView>> {
        if self.config.cache_capacity == 0 {
            return process_changes(chain, catalog, reference_id, focus_id).map(Arc::new);
        }

        let key = compute_inputs_hash(chain, catalog, reference_id, focus_id)?;
        if let Some(view) = self.lookup(&key)? {
            log::debug!("Changes view cache hit for {}", &key[..12]);
            return Ok(view);
        }

        let view = Arc::new(process_changes(chain, catalog, reference_id, focus_id)?);
        self.store(key, Arc::clone(&view))?;
        Ok(view)
    }

    fn invalidate(&self) -> Result<()> {
        let mut cache = self
            .cache
            .write()
            .map_err(|e| ChangesError::CacheError(e.to_string()))?;
        cache.clear();
        Ok(())
    }
}
