//! Facebook OAuth provider implementation

use async_trait::async_trait;
use oauth2::{AuthorizationCode, CsrfToken, Scope, TokenResponse};
use reqwest::Client as HttpClient;

use crate::auth::provider::{OAuthProvider, OAuthTokens, Principal};
use crate::auth::providers::{build_http_client, build_oauth_client, ConfiguredClient};
use crate::config::ProviderConfig;
use crate::error::Error;

const AUTH_URL: &str = "https://www.facebook.com/v19.0/dialog/oauth";
const TOKEN_URL: &str = "https://graph.facebook.com/v19.0/oauth/access_token";
const USERINFO_URL: &str = "https://graph.facebook.com/v19.0/me";

/// Facebook OAuth provider
#[derive(Clone)]
pub struct FacebookProvider {
    client: ConfiguredClient,
    http_client: HttpClient,
    scopes: Vec<String>,
}

impl FacebookProvider {
    /// Create a new Facebook OAuth provider from configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, Error> {
        let client = build_oauth_client(config, AUTH_URL, TOKEN_URL)?;
        let http_client = build_http_client()?;

        let scopes = if config.scopes.is_empty() {
            vec!["public_profile".to_string(), "email".to_string()]
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
impl OAuthProvider for FacebookProvider {
    fn name(&self) -> &str {
        "facebook"
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
            .map_err(|e| super::map_token_error("Facebook", e))?;

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
            .query(&[("fields", "id,name,email,picture")])
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Failed to fetch Facebook profile: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::AuthenticationFailed(format!(
                "Facebook profile request failed: {} - {}",
                status, body
            )));
        }

        let profile: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Transport(format!("Failed to parse Facebook profile: {}", e)))?;

        Ok(Principal {
            provider: "facebook".to_string(),
            provider_user_id: profile["id"]
                .as_str()
                .ok_or_else(|| {
                    Error::AuthenticationFailed("Missing id in Facebook profile".to_string())
                })?
                .to_string(),
            display_name: profile["name"].as_str().map(|s| s.to_string()),
            email: profile["email"].as_str().map(|s| s.to_string()),
            picture: profile["picture"]["data"]["url"]
                .as_str()
                .map(|s| s.to_string()),
            raw: profile,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ProviderConfig {
        ProviderConfig {
            client_id: "test-client-id".to_string(),
            client_secret: "test-secret".to_string(),
            callback_url: Some("http://localhost:8080/login/facebook/return".to_string()),
            scopes: vec![],
        }
    }

    #[test]
    fn test_authorization_url_generation() {
        let provider = FacebookProvider::new(&test_config()).unwrap();
        let url = provider.authorization_url("test-state");

        assert!(url.contains("facebook.com"));
        assert!(url.contains("client_id=test-client-id"));
        assert!(url.contains("state=test-state"));
        assert!(url.contains("redirect_uri="));
        assert!(url.contains("public_profile"));
    }

    #[test]
    fn test_configured_scopes_override_defaults() {
        let mut config = test_config();
        config.scopes = vec!["public_profile".to_string()];
        let provider = FacebookProvider::new(&config).unwrap();
        let url = provider.authorization_url("s");

        assert!(url.contains("public_profile"));
        assert!(!url.contains("email"));
    }

    #[test]
    fn test_provider_name() {
        let provider = FacebookProvider::new(&test_config()).unwrap();
        assert_eq!(provider.name(), "facebook");
    }
}
