//! Core error types for the fxchain engine.
//!
//! Missing exchange rates are not errors: they are represented as unresolved
//! values on the resolved changes. Only catalog inconsistencies and malformed
//! input surface here.

use thiserror::Error;

use crate::changes::ChangesError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Changes error: {0}")]
    Changes(#[from] ChangesError),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Returns true when the error comes from a currency id missing in the catalog.
    pub fn is_catalog_inconsistency(&self) -> bool {
        matches!(
            self,
            Error::Changes(ChangesError::CurrencyNotFound { .. })
                | Error::Changes(ChangesError::UnknownReferenceCurrency(_))
                | Error::Changes(ChangesError::UnknownFocusCurrency(_))
        )
    }
}
