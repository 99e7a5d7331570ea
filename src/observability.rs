//! Tracing initialization

use tracing_subscriber::EnvFilter;

use crate::{config::AppConfig, error::Result};

/// Initialize JSON-formatted tracing from the configured log level
///
/// The `RUST_LOG` syntax is accepted in `service.log_level`, so directives
/// like `info,stworld=debug` work.
pub fn init_tracing(config: &AppConfig) -> Result<()> {
    let log_level = config.service.log_level.clone();

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Tracing initialized for service: {}", config.service.name);

    Ok(())
}
