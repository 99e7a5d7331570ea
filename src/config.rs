//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Environment variables (the legacy provider names plus `PORT`)
//! 2. Current working directory: ./config.toml
//! 3. Default values

use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::auth::registry::ProviderKind;
use crate::error::Result;

/// Environment variables recognized for provider credentials, mapped to their
/// nested configuration keys. These are the names the deployment already
/// exports, so they stay first-class rather than requiring a prefix scheme.
const LEGACY_PROVIDER_ENV: &[(&str, &str)] = &[
    ("FB_CLIENT_ID", "providers.facebook.client_id"),
    ("FB_CLIENT_SECRET", "providers.facebook.client_secret"),
    ("TW_CONSUMER_KEY", "providers.twitter.client_id"),
    ("TW_CONSUMER_SECRET", "providers.twitter.client_secret"),
    ("GOOG_CLIENT_ID", "providers.google.client_id"),
    ("GOOG_CLIENT_SECRET", "providers.google.client_secret"),
    ("LINE_CHANNEL_ID", "providers.line.client_id"),
    ("LINE_CHANNEL_SECRET", "providers.line.client_secret"),
];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Service configuration
    #[serde(default)]
    pub service: ServiceConfig,

    /// Session configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Identity provider configuration
    #[serde(default)]
    pub providers: ProvidersConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Request body size limit in MB
    #[serde(default = "default_body_limit_mb")]
    pub body_limit_mb: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            port: default_port(),
            log_level: default_log_level(),
            timeout_secs: default_timeout(),
            body_limit_mb: default_body_limit_mb(),
        }
    }
}

/// Cookie session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session cookie name
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Session expiry in seconds of inactivity (0 = expire when browser closes)
    #[serde(default = "default_expiry_secs")]
    pub expiry_secs: u64,

    /// Only send the cookie over HTTPS
    #[serde(default = "default_false")]
    pub secure: bool,

    /// Hide the cookie from client-side scripts
    #[serde(default = "default_true")]
    pub http_only: bool,

    /// SameSite policy: "strict", "lax", or "none"
    #[serde(default = "default_same_site")]
    pub same_site: String,

    /// Cookie path
    #[serde(default = "default_cookie_path")]
    pub cookie_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            expiry_secs: default_expiry_secs(),
            secure: false,
            http_only: true,
            same_site: default_same_site(),
            cookie_path: default_cookie_path(),
        }
    }
}

/// One configuration block per supported provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub facebook: ProviderConfig,

    #[serde(default)]
    pub twitter: ProviderConfig,

    #[serde(default)]
    pub line: ProviderConfig,

    #[serde(default)]
    pub google: ProviderConfig,
}

impl ProvidersConfig {
    /// Get the configuration block for a provider
    pub fn get(&self, kind: ProviderKind) -> &ProviderConfig {
        match kind {
            ProviderKind::Facebook => &self.facebook,
            ProviderKind::Twitter => &self.twitter,
            ProviderKind::Line => &self.line,
            ProviderKind::Google => &self.google,
        }
    }
}

/// Individual provider configuration
///
/// Missing credentials do not fail startup; the gap surfaces as a failure
/// redirect when that provider's flow is exercised.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// OAuth client ID (consumer key / channel ID, depending on provider)
    #[serde(default)]
    pub client_id: String,

    /// OAuth client secret (consumer secret / channel secret)
    #[serde(default)]
    pub client_secret: String,

    /// Callback URL the provider redirects back to.
    /// Defaults to `http://localhost:{port}/login/{provider}/return`.
    #[serde(default)]
    pub callback_url: Option<String>,

    /// OAuth scopes to request (empty = provider defaults)
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl ProviderConfig {
    /// Whether both halves of the credential pair are present
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

impl AppConfig {
    /// Load configuration from ./config.toml and the environment
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    /// Load configuration from a specific file path
    ///
    /// Useful for testing or non-standard deployments. Environment variables
    /// still take precedence over the file.
    pub fn load_from(path: &str) -> Result<Self> {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path));

        for (var, key) in LEGACY_PROVIDER_ENV {
            if let Ok(value) = std::env::var(var) {
                figment = figment.merge(Serialized::global(key, value));
            }
        }

        if let Ok(port) = std::env::var("PORT") {
            let port: u16 = port
                .parse()
                .map_err(|_| figment::Error::from(format!("invalid PORT value: {port}")))?;
            figment = figment.merge(Serialized::global("service.port", port));
        }

        let config = figment.extract()?;
        Ok(config)
    }

    /// Effective callback URL for a provider
    pub fn callback_url(&self, kind: ProviderKind) -> String {
        match &self.providers.get(kind).callback_url {
            Some(url) => url.clone(),
            None => format!(
                "http://localhost:{}/login/{}/return",
                self.service.port,
                kind.as_str()
            ),
        }
    }
}

// Default value functions

fn default_service_name() -> String {
    "stworld".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_body_limit_mb() -> usize {
    2
}

fn default_cookie_name() -> String {
    "session_id".to_string()
}

fn default_expiry_secs() -> u64 {
    86400 // 1 day
}

fn default_same_site() -> String {
    "lax".to_string()
}

fn default_cookie_path() -> String {
    "/".to_string()
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.service.port, 8080);
        assert_eq!(config.service.name, "stworld");
        assert_eq!(config.session.cookie_name, "session_id");
        assert_eq!(config.session.expiry_secs, 86400);
        assert!(config.session.http_only);
        assert!(!config.providers.facebook.is_configured());
    }

    #[test]
    fn test_default_callback_url() {
        let config = AppConfig::default();
        assert_eq!(
            config.callback_url(ProviderKind::Facebook),
            "http://localhost:8080/login/facebook/return"
        );
        assert_eq!(
            config.callback_url(ProviderKind::Google),
            "http://localhost:8080/login/google/return"
        );
    }

    #[test]
    fn test_explicit_callback_url_wins() {
        let mut config = AppConfig::default();
        config.providers.line.callback_url =
            Some("https://example.com/login/line/return".to_string());
        assert_eq!(
            config.callback_url(ProviderKind::Line),
            "https://example.com/login/line/return"
        );
    }

    #[test]
    fn test_legacy_env_mapping() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("FB_CLIENT_ID", "fb-id");
            jail.set_env("FB_CLIENT_SECRET", "fb-secret");
            jail.set_env("TW_CONSUMER_KEY", "tw-key");
            jail.set_env("TW_CONSUMER_SECRET", "tw-secret");
            jail.set_env("LINE_CHANNEL_ID", "line-id");
            jail.set_env("LINE_CHANNEL_SECRET", "line-secret");
            jail.set_env("GOOG_CLIENT_ID", "goog-id");
            jail.set_env("GOOG_CLIENT_SECRET", "goog-secret");
            jail.set_env("PORT", "9001");

            let config = AppConfig::load().map_err(|e| figment::Error::from(e.to_string()))?;
            assert_eq!(config.providers.facebook.client_id, "fb-id");
            assert_eq!(config.providers.facebook.client_secret, "fb-secret");
            assert_eq!(config.providers.twitter.client_id, "tw-key");
            assert_eq!(config.providers.line.client_id, "line-id");
            assert_eq!(config.providers.google.client_secret, "goog-secret");
            assert_eq!(config.service.port, 9001);
            assert!(config.providers.facebook.is_configured());
            Ok(())
        });
    }

    #[test]
    fn test_config_file_overridden_by_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [service]
                port = 3000

                [providers.facebook]
                client_id = "from-file"
                client_secret = "from-file"
                "#,
            )?;
            jail.set_env("FB_CLIENT_ID", "from-env");

            let config = AppConfig::load().map_err(|e| figment::Error::from(e.to_string()))?;
            assert_eq!(config.service.port, 3000);
            assert_eq!(config.providers.facebook.client_id, "from-env");
            assert_eq!(config.providers.facebook.client_secret, "from-file");
            Ok(())
        });
    }

    #[test]
    fn test_invalid_port_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("PORT", "not-a-port");
            assert!(AppConfig::load_from("config.toml").is_err());
            Ok(())
        });
    }
}
