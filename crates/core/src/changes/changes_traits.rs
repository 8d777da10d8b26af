use std::sync::Arc;

use super::changes_model::{Change, ChangesView};
use crate::currencies::CurrencyCatalog;
use crate::errors::Result;

/// Trait defining the contract the presentation layer uses to obtain a changes view.
pub trait ChangesServiceTrait: Send + Sync {
    /// Returns the `{list, graph, usedCurrencies}` view for the given inputs.
    ///
    /// Identical inputs always yield an identical view.
    fn get_changes_view(
        &self,
        chain: &[Change],
        catalog: &CurrencyCatalog,
        reference_id: &str,
        focus_id: Option<&str>,
    ) -> Result<Arc<ChangesView>>;

    /// Drops every memoized view.
    fn invalidate(&self) -> Result<()>;
}
