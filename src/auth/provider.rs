//! OAuth provider trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// OAuth tokens received from a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthTokens {
    /// Access token from the provider
    pub access_token: String,

    /// Refresh token (if provided)
    pub refresh_token: Option<String>,

    /// Token lifetime in seconds (if provided)
    pub expires_in: Option<i64>,

    /// Token type (usually "Bearer")
    pub token_type: String,
}

/// The authenticated identity associated with a session.
///
/// A few fields are lifted out for rendering and for the canonical
/// `provider` + `provider_user_id` key; the verbatim provider profile is
/// preserved in `raw`, so storing a Principal loses nothing the provider
/// returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    /// Provider name (e.g., "facebook", "line")
    pub provider: String,

    /// User ID from the provider
    pub provider_user_id: String,

    /// User's display name
    pub display_name: Option<String>,

    /// User's email address (not all providers expose one)
    pub email: Option<String>,

    /// User's profile picture URL
    pub picture: Option<String>,

    /// Raw provider-specific profile data
    pub raw: serde_json::Value,
}

/// Strategy adapter contract implemented once per identity provider
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// Get the provider name (e.g., "facebook", "twitter")
    fn name(&self) -> &str;

    /// Generate the authorization URL for redirecting users
    ///
    /// # Arguments
    ///
    /// * `state` - CSRF protection state value
    fn authorization_url(&self, state: &str) -> String;

    /// Exchange an authorization code for tokens
    ///
    /// # Arguments
    ///
    /// * `code` - Authorization code from the callback
    async fn exchange_code(&self, code: &str) -> Result<OAuthTokens, Error>;

    /// Fetch and verify the user's profile using an access token
    ///
    /// # Arguments
    ///
    /// * `access_token` - Access token from the provider
    async fn get_user_info(&self, access_token: &str) -> Result<Principal, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_round_trips_through_json() {
        let principal = Principal {
            provider: "facebook".to_string(),
            provider_user_id: "12345".to_string(),
            display_name: Some("Alex Example".to_string()),
            email: None,
            picture: Some("https://example.com/p.jpg".to_string()),
            raw: serde_json::json!({"id": "12345", "name": "Alex Example"}),
        };

        let json = serde_json::to_string(&principal).unwrap();
        let parsed: Principal = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, principal);
    }
}
