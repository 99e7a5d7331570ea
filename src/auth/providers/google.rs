//! Google OAuth provider implementation

use async_trait::async_trait;
use oauth2::{AuthorizationCode, CsrfToken, Scope, TokenResponse};
use reqwest::Client as HttpClient;

use crate::auth::provider::{OAuthProvider, OAuthTokens, Principal};
use crate::auth::providers::{build_http_client, build_oauth_client, ConfiguredClient};
use crate::config::ProviderConfig;
use crate::error::Error;

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

/// Google OAuth provider
#[derive(Clone)]
pub struct GoogleProvider {
    client: ConfiguredClient,
    http_client: HttpClient,
    scopes: Vec<String>,
}

impl GoogleProvider {
    /// Create a new Google OAuth provider from configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, Error> {
        let client = build_oauth_client(config, AUTH_URL, TOKEN_URL)?;
        let http_client = build_http_client()?;

        let scopes = if config.scopes.is_empty() {
            vec![
                "openid".to_string(),
                "email".to_string(),
                "profile".to_string(),
            ]
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
impl OAuthProvider for GoogleProvider {
    fn name(&self) -> &str {
        "google"
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
            .map_err(|e| super::map_token_error("Google", e))?;

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
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Failed to fetch Google user info: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::AuthenticationFailed(format!(
                "Google user info request failed: {} - {}",
                status, body
            )));
        }

        let profile: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Transport(format!("Failed to parse Google user info: {}", e)))?;

        Ok(Principal {
            provider: "google".to_string(),
            provider_user_id: profile["sub"]
                .as_str()
                .ok_or_else(|| {
                    Error::AuthenticationFailed("Missing sub in Google response".to_string())
                })?
                .to_string(),
            display_name: profile["name"].as_str().map(|s| s.to_string()),
            email: profile["email"].as_str().map(|s| s.to_string()),
            picture: profile["picture"].as_str().map(|s| s.to_string()),
            raw: profile,
        })
    }
}
