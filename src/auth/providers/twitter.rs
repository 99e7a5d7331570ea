//! Twitter (X) OAuth provider implementation
//!
//! Uses the OAuth 2.0 authorization-code flow on the v2 API. The consumer
//! key/secret pair from the legacy OAuth 1.0a app configuration maps onto
//! client id/secret here.

use async_trait::async_trait;
use oauth2::{AuthorizationCode, CsrfToken, Scope, TokenResponse};
use reqwest::Client as HttpClient;

use crate::auth::provider::{OAuthProvider, OAuthTokens, Principal};
use crate::auth::providers::{build_http_client, build_oauth_client, ConfiguredClient};
use crate::config::ProviderConfig;
use crate::error::Error;

const AUTH_URL: &str = "https://twitter.com/i/oauth2/authorize";
const TOKEN_URL: &str = "https://api.twitter.com/2/oauth2/token";
const USERINFO_URL: &str = "https://api.twitter.com/2/users/me";

/// Twitter OAuth provider
#[derive(Clone)]
pub struct TwitterProvider {
    client: ConfiguredClient,
    http_client: HttpClient,
    scopes: Vec<String>,
}

impl TwitterProvider {
    /// Create a new Twitter OAuth provider from configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, Error> {
        let client = build_oauth_client(config, AUTH_URL, TOKEN_URL)?;
        let http_client = build_http_client()?;

        // users.read is only granted alongside tweet.read
        let scopes = if config.scopes.is_empty() {
            vec!["users.read".to_string(), "tweet.read".to_string()]
        } else {
            config.scopes.clone()
        };

        Ok(Self {
            client,
            http_client,
            scopes,
        })
    }
}

#[async_trait]
impl OAuthProvider for TwitterProvider {
    fn name(&self) -> &str {
        "twitter"
    }

    fn authorization_url(&self, state: &str) -> String {
        let mut auth_request = self
            .client
            .authorize_url(|| CsrfToken::new(state.to_string()));

        for scope in &self.scopes {
            auth_request = auth_request.add_scope(Scope::new(scope.clone()));
        }

        let (url, _) = auth_request.url();
        url.to_string()
    }

    async fn exchange_code(&self, code: &str) -> Result<OAuthTokens, Error> {
        let token_result = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http_client)
            .await
            .map_err(|e| super::map_token_error("Twitter", e))?;

        Ok(OAuthTokens {
            access_token: token_result.access_token().secret().clone(),
            refresh_token: token_result.refresh_token().map(|t| t.secret().clone()),
            expires_in: token_result.expires_in().map(|d| d.as_secs() as i64),
            token_type: "Bearer".to_string(),
        })
    }

    async fn get_user_info(&self, access_token: &str) -> Result<Principal, Error> {
        let response = self
            .http_client
            .get(USERINFO_URL)
            .query(&[("user.fields", "profile_image_url")])
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Failed to fetch Twitter profile: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::AuthenticationFailed(format!(
                "Twitter profile request failed: {} - {}",
                status, body
            )));
        }

        let profile: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Transport(format!("Failed to parse Twitter profile: {}", e)))?;

        // v2 wraps the user object in a "data" envelope; email is not exposed
        let user = &profile["data"];

        Ok(Principal {
            provider: "twitter".to_string(),
            provider_user_id: user["id"]
                .as_str()
                .ok_or_else(|| {
                    Error::AuthenticationFailed("Missing id in Twitter profile".to_string())
                })?
                .to_string(),
            display_name: user["name"]
                .as_str()
                .or(user["username"].as_str())
                .map(|s| s.to_string()),
            email: None,
            picture: user["profile_image_url"].as_str().map(|s| s.to_string()),
            raw: profile,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ProviderConfig {
        ProviderConfig {
            client_id: "test-consumer-key".to_string(),
            client_secret: "test-consumer-secret".to_string(),
            callback_url: Some("http://localhost:8080/login/twitter/return".to_string()),
            scopes: vec![],
        }
    }

    #[test]
    fn test_authorization_url_generation() {
        let provider = TwitterProvider::new(&test_config()).unwrap();
        let url = provider.authorization_url("test-state");

        assert!(url.contains("twitter.com"));
        assert!(url.contains("client_id=test-consumer-key"));
        assert!(url.contains("state=test-state"));
    }

    #[test]
    fn test_default_scopes_requested() {
        let provider = TwitterProvider::new(&test_config()).unwrap();
        let url = provider.authorization_url("s");

        assert!(url.contains("users.read"));
        assert!(url.contains("tweet.read"));
    }

    #[test]
    fn test_provider_name() {
        let provider = TwitterProvider::new(&test_config()).unwrap();
        assert_eq!(provider.name(), "twitter");
    }
}
