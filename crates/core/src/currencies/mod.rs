//! Currencies module - the currency catalog shared by every other module.

mod currencies_model;

pub use currencies_model::{deserialize_id, Currency, CurrencyCatalog, CurrencyId};
