//! HTTP routing
//!
//! [`app_router`] assembles the route set without state or middleware so
//! tests can merge extra routes inside the session layer; [`build_router`]
//! is the complete application.

mod api;
mod login;
mod profile;

pub use api::ApiWelcome;

use axum::Router;

use crate::session::{create_memory_session_layer, MemoryStore, SessionManagerLayer};
use crate::state::AppState;

/// All application routes, without the session layer or state applied
pub fn app_router() -> Router<AppState> {
    Router::new()
        .merge(login::router())
        .merge(profile::router())
        .nest("/api", api::router())
}

/// The complete application router
pub fn build_router(state: AppState) -> Router {
    let session_layer = create_memory_session_layer(&state.config().session);
    build_router_with(app_router(), state, session_layer)
}

/// Assemble a router from parts.
///
/// The session layer wraps every route so the extractors always find a
/// session in the request extensions.
pub fn build_router_with(
    routes: Router<AppState>,
    state: AppState,
    session_layer: SessionManagerLayer<MemoryStore>,
) -> Router {
    routes.layer(session_layer).with_state(state)
}
