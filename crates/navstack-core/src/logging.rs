#![forbid(unsafe_code)]

//! JSON log output for embedders that do not install their own subscriber.
//!
//! The filter is read from `NAVSTACK_LOG` (same syntax as `RUST_LOG`) and
//! defaults to `info`.

use tracing_subscriber::EnvFilter;

/// Environment variable consulted by [`init_json`].
pub const LOG_ENV: &str = "NAVSTACK_LOG";

type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Install a global JSON subscriber filtered by `NAVSTACK_LOG`.
pub fn init_json() -> Result<(), InitError> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    init_with_filter(filter)
}

/// Install a global JSON subscriber with an explicit filter.
///
/// Fails if a global subscriber is already set.
pub fn init_with_filter(filter: EnvFilter) -> Result<(), InitError> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
}
