//! Logging setup.
//!
//! `RUST_LOG` wins over the configured level when it is set.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{RelayError, RelayResult};

/// Install the global subscriber. Call once, before anything logs.
pub fn init(level: &str, json_format: bool) -> RelayResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| RelayError::Config(format!("invalid log level '{}': {}", level, e)))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if json_format {
        registry
            .with(fmt::layer().json().with_target(true).with_current_span(true))
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    result.map_err(|e| RelayError::Config(format!("logger already initialized: {}", e)))
}
