//! Login pages and the authorization flow routes
//!
//! One generic route set serves all four providers: the per-provider pages
//! are registered from [`ProviderKind::ALL`] and the initiate/callback pair
//! takes the provider as a path parameter. Flow failures on the callback
//! resolve to a redirect to `/login`, never an error page.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::auth::{ProviderKind, StateData};
use crate::error::Error;
use crate::pages::{HtmlPage, IndexTemplate, LoginIndexTemplate, LoginTemplate};
use crate::session::{CurrentUser, FlowSession};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    let mut router = Router::new()
        .route("/", get(index))
        .route("/login", get(login_index))
        .route("/login/{provider}", get(initiate))
        .route("/login/{provider}/return", get(callback))
        .route("/logout", get(logout));

    for kind in ProviderKind::ALL {
        router = router.route(
            &format!("/login_{}", kind.route_suffix()),
            get(move || async move { HtmlPage(LoginTemplate::new(kind)) }),
        );
    }

    router
}

/// Index page with the login links and the signed-in greeting
async fn index(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    HtmlPage(IndexTemplate::new(user.as_ref()))
}

/// Generic login entry page, also the failure redirect target
async fn login_index() -> impl IntoResponse {
    HtmlPage(LoginIndexTemplate::new())
}

/// Start the authorization flow: store fresh state, redirect to the
/// provider's consent screen.
async fn initiate(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    flow: FlowSession,
) -> Result<Response, Error> {
    let kind = parse_provider(&provider)?;

    let pending = StateData::new(kind.as_str());
    flow.set_state(&pending).await?;

    let url = state.providers().get(kind).adapter.authorization_url(&pending.value);
    tracing::debug!(provider = %kind, "Redirecting to consent screen");
    Ok(Redirect::to(&url).into_response())
}

/// Query parameters the provider sends back to the callback
#[derive(Debug, Deserialize)]
struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// Complete the authorization flow.
///
/// Success stores the principal and redirects home. Every flow failure
/// (denied consent, bad state, exchange error, missing credentials) logs
/// and redirects to `/login`; only non-flow errors surface as responses.
async fn callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(query): Query<CallbackQuery>,
    flow: FlowSession,
) -> Result<Response, Error> {
    let kind = parse_provider(&provider)?;

    match complete_login(&state, kind, query, &flow).await {
        Ok(()) => Ok(Redirect::to("/").into_response()),
        Err(err) if err.is_flow_failure() => {
            tracing::warn!(provider = %kind, "Login failed: {err}");
            Ok(Redirect::to("/login").into_response())
        }
        Err(err) => Err(err),
    }
}

async fn complete_login(
    state: &AppState,
    kind: ProviderKind,
    query: CallbackQuery,
    flow: &FlowSession,
) -> Result<(), Error> {
    let entry = state.providers().get(kind);
    if !entry.configured {
        return Err(Error::ConfigurationMissing(kind.as_str().to_string()));
    }

    if let Some(error) = query.error {
        return Err(Error::AuthenticationFailed(format!(
            "Provider denied the request: {error}"
        )));
    }

    let code = query.code.ok_or_else(|| {
        Error::AuthenticationFailed("Callback missing authorization code".to_string())
    })?;
    let returned_state = query
        .state
        .ok_or_else(|| Error::AuthenticationFailed("Callback missing state".to_string()))?;

    // Consumed on read; a replayed callback finds no pending flow
    let pending = flow
        .take_state()
        .await?
        .ok_or_else(|| Error::AuthenticationFailed("No login flow in progress".to_string()))?;

    if pending.provider != kind.as_str() || pending.value != returned_state {
        return Err(Error::AuthenticationFailed(
            "State validation failed".to_string(),
        ));
    }
    if pending.is_expired() {
        return Err(Error::AuthenticationFailed(
            "Login flow expired".to_string(),
        ));
    }

    let tokens = entry.adapter.exchange_code(&code).await?;
    let principal = entry.adapter.get_user_info(&tokens.access_token).await?;

    // New session ID before the session becomes authenticated
    flow.regenerate().await?;
    flow.set_principal(state.codec().as_ref(), &principal).await?;

    tracing::info!(
        provider = %kind,
        user_id = %principal.provider_user_id,
        "Login complete"
    );
    Ok(())
}

/// Destroy the session and return home
async fn logout(flow: FlowSession) -> Result<Response, Error> {
    flow.destroy().await?;
    Ok(Redirect::to("/").into_response())
}

fn parse_provider(segment: &str) -> Result<ProviderKind, Error> {
    ProviderKind::parse(segment)
        .ok_or_else(|| Error::NotFound(format!("Unknown provider: {segment}")))
}
