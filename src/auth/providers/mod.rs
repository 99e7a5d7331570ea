//! OAuth provider implementations
//!
//! Built-in support for Facebook, Twitter, LINE, and Google.

pub mod facebook;
pub mod google;
pub mod line;
pub mod twitter;

pub use facebook::FacebookProvider;
pub use google::GoogleProvider;
pub use line::LineProvider;
pub use twitter::TwitterProvider;

use oauth2::{
    basic::BasicErrorResponse, AuthUrl, Client, ClientId, ClientSecret, EmptyExtraTokenFields,
    RedirectUrl, StandardRevocableToken, StandardTokenIntrospectionResponse,
    StandardTokenResponse, TokenUrl,
};
use reqwest::Client as HttpClient;

use crate::config::ProviderConfig;
use crate::error::Error;

/// Type alias for our configured OAuth client
pub(crate) type ConfiguredClient = Client<
    BasicErrorResponse,
    StandardTokenResponse<EmptyExtraTokenFields, oauth2::basic::BasicTokenType>,
    StandardTokenIntrospectionResponse<EmptyExtraTokenFields, oauth2::basic::BasicTokenType>,
    StandardRevocableToken,
    BasicErrorResponse,
    oauth2::EndpointSet,
    oauth2::EndpointNotSet,
    oauth2::EndpointNotSet,
    oauth2::EndpointNotSet,
    oauth2::EndpointSet,
>;

/// Wire an OAuth client for one provider's endpoints
pub(crate) fn build_oauth_client(
    config: &ProviderConfig,
    auth_url: &str,
    token_url: &str,
) -> Result<ConfiguredClient, Error> {
    let client = Client::new(ClientId::new(config.client_id.clone()))
        .set_client_secret(ClientSecret::new(config.client_secret.clone()))
        .set_auth_uri(
            AuthUrl::new(auth_url.to_string())
                .map_err(|e| Error::Internal(format!("Invalid authorization URL: {}", e)))?,
        )
        .set_token_uri(
            TokenUrl::new(token_url.to_string())
                .map_err(|e| Error::Internal(format!("Invalid token URL: {}", e)))?,
        )
        .set_redirect_uri(
            config
                .callback_url
                .clone()
                .map(RedirectUrl::new)
                .transpose()
                .map_err(|e| Error::Internal(format!("Invalid callback URL: {}", e)))?
                .ok_or_else(|| Error::Internal("Missing callback URL".to_string()))?,
        );

    Ok(client)
}

/// HTTP client for token exchange and userinfo requests.
///
/// Following redirects is unsafe for an OAuth client and must stay disabled.
pub(crate) fn build_http_client() -> Result<HttpClient, Error> {
    HttpClient::builder()
        .redirect(reqwest::redirect::Policy::none())
        .user_agent("stworld")
        .build()
        .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))
}

/// Map an `oauth2` token-exchange error onto the flow taxonomy: a provider
/// response that rejects the code is an authentication failure, anything
/// else is transport.
pub(crate) fn map_token_error<RE: std::error::Error>(
    provider: &str,
    err: oauth2::RequestTokenError<RE, BasicErrorResponse>,
) -> Error {
    match err {
        oauth2::RequestTokenError::ServerResponse(resp) => Error::AuthenticationFailed(format!(
            "{} rejected the authorization code: {}",
            provider, resp
        )),
        other => Error::Transport(format!("{} token exchange failed: {}", provider, other)),
    }
}
