//! Provider registry built once from configuration at startup
//!
//! The registry is the configuration table the route dispatcher is driven
//! by: one entry per supported provider, constructed at startup and shared
//! read-only behind an `Arc`. Providers without credentials still get an
//! entry so their routes exist; the missing configuration surfaces as a
//! failure redirect when the callback is exercised.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::auth::provider::OAuthProvider;
use crate::auth::providers::{FacebookProvider, GoogleProvider, LineProvider, TwitterProvider};
use crate::config::{AppConfig, ProviderConfig};
use crate::error::Result;

/// The four supported identity providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Facebook,
    Twitter,
    Line,
    Google,
}

impl ProviderKind {
    /// All supported providers, in route-registration order
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Facebook,
        ProviderKind::Twitter,
        ProviderKind::Line,
        ProviderKind::Google,
    ];

    /// The provider key used in `/login/{provider}` URLs
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Facebook => "facebook",
            ProviderKind::Twitter => "twitter",
            ProviderKind::Line => "line",
            ProviderKind::Google => "google",
        }
    }

    /// The short suffix used in `/login_{suffix}` and `/profile_{suffix}`
    pub fn route_suffix(&self) -> &'static str {
        match self {
            ProviderKind::Facebook => "fb",
            ProviderKind::Twitter => "tw",
            ProviderKind::Line => "line",
            ProviderKind::Google => "google",
        }
    }

    /// Human-readable provider name for page rendering
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Facebook => "Facebook",
            ProviderKind::Twitter => "Twitter",
            ProviderKind::Line => "LINE",
            ProviderKind::Google => "Google",
        }
    }

    /// Parse the provider key from a URL path segment
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "facebook" => Some(ProviderKind::Facebook),
            "twitter" => Some(ProviderKind::Twitter),
            "line" => Some(ProviderKind::Line),
            "google" => Some(ProviderKind::Google),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One registered provider: the strategy adapter plus whether credentials
/// were actually supplied
pub struct ProviderEntry {
    /// The strategy adapter
    pub adapter: Arc<dyn OAuthProvider>,

    /// Whether the credential pair was present at startup
    pub configured: bool,
}

/// Read-only table of provider entries
pub struct ProviderRegistry {
    facebook: ProviderEntry,
    twitter: ProviderEntry,
    line: ProviderEntry,
    google: ProviderEntry,
}

impl ProviderRegistry {
    /// Build the registry from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let facebook = resolve(config, ProviderKind::Facebook);
        let twitter = resolve(config, ProviderKind::Twitter);
        let line = resolve(config, ProviderKind::Line);
        let google = resolve(config, ProviderKind::Google);

        Ok(Self {
            facebook: ProviderEntry {
                configured: facebook.is_configured(),
                adapter: Arc::new(FacebookProvider::new(&facebook)?),
            },
            twitter: ProviderEntry {
                configured: twitter.is_configured(),
                adapter: Arc::new(TwitterProvider::new(&twitter)?),
            },
            line: ProviderEntry {
                configured: line.is_configured(),
                adapter: Arc::new(LineProvider::new(&line)?),
            },
            google: ProviderEntry {
                configured: google.is_configured(),
                adapter: Arc::new(GoogleProvider::new(&google)?),
            },
        })
    }

    /// Build a registry from pre-constructed entries, for tests and for
    /// swapping in alternative adapter implementations.
    pub fn from_entries(
        facebook: ProviderEntry,
        twitter: ProviderEntry,
        line: ProviderEntry,
        google: ProviderEntry,
    ) -> Self {
        Self {
            facebook,
            twitter,
            line,
            google,
        }
    }

    /// Look up the entry for a provider
    pub fn get(&self, kind: ProviderKind) -> &ProviderEntry {
        match kind {
            ProviderKind::Facebook => &self.facebook,
            ProviderKind::Twitter => &self.twitter,
            ProviderKind::Line => &self.line,
            ProviderKind::Google => &self.google,
        }
    }
}

/// Clone the provider's config block with the callback URL filled in
fn resolve(config: &AppConfig, kind: ProviderKind) -> ProviderConfig {
    let mut provider = config.providers.get(kind).clone();
    provider.callback_url = Some(config.callback_url(kind));
    provider
}
