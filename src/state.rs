//! Shared application state

use std::sync::Arc;

use crate::auth::ProviderRegistry;
use crate::config::AppConfig;
use crate::error::Result;
use crate::session::{IdentityCodec, PrincipalCodec};

/// State shared across all request handlers.
///
/// Built once at startup and cloned per request; every field is an `Arc`
/// so the clone is cheap.
#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
    providers: Arc<ProviderRegistry>,
    codec: Arc<dyn PrincipalCodec>,
}

impl AppState {
    /// Build state from configuration with the default session codec
    pub fn new(config: AppConfig) -> Result<Self> {
        let providers = ProviderRegistry::from_config(&config)?;
        Ok(Self {
            config: Arc::new(config),
            providers: Arc::new(providers),
            codec: Arc::new(IdentityCodec),
        })
    }

    /// Replace the session codec, e.g. with a database-backed one
    pub fn with_codec(mut self, codec: Arc<dyn PrincipalCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    pub fn codec(&self) -> &Arc<dyn PrincipalCodec> {
        &self.codec
    }
}
