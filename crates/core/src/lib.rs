//! fxchain Core - exchange rate resolution and history engine.
//!
//! Given a chronologically ordered chain of currency exchange events, this crate
//! reconstructs the historical rate of any currency against a reference
//! currency (direct rates first, one-hop rates as a fallback), classifies the
//! trend between consecutive points and builds per-currency chart series.
//!
//! Every operation is a pure, synchronous transformation of its inputs. Fetching
//! the chain and the currency catalog is left to the caller.

pub mod changes;
pub mod currencies;
pub mod errors;
pub mod utils;

// Re-export the public surface
pub use changes::*;
pub use currencies::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
