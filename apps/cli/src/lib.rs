pub mod config;
pub mod main_lib;

pub use config::Config;
pub use main_lib::{build_view, init_tracing, load_snapshot, resolve_currency_id, run, ChainSnapshot};
