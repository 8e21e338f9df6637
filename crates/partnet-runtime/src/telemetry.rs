//! Tracing setup

use tracing_subscriber::EnvFilter;

use crate::{LoggingConfig, RuntimeError, RuntimeResult};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured filter. Fails if a global
/// subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> RuntimeResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| RuntimeError::Telemetry(e.to_string()))
}
