use thiserror::Error;

/// Errors raised while resolving a chain of changes.
///
/// A missing exchange rate is not one of them: gaps in rate coverage are a
/// normal state and show up as unresolved rates on the output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChangesError {
    #[error("Change {change_id} references unknown currency '{currency_id}'")]
    CurrencyNotFound {
        change_id: String,
        currency_id: String,
    },

    #[error("Reference currency '{0}' is not in the catalog")]
    UnknownReferenceCurrency(String),

    #[error("Focus currency '{0}' is not in the catalog")]
    UnknownFocusCurrency(String),

    #[error("Change {change_id} has an invalid date '{value}'")]
    InvalidChangeDate { change_id: String, value: String },

    #[error("Cache error: {0}")]
    CacheError(String),
}
