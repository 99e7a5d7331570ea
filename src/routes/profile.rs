//! Guarded profile pages

use axum::{
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};

use crate::auth::ProviderKind;
use crate::pages::{HtmlPage, ProfileTemplate};
use crate::session::CurrentUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    let mut router = Router::new();

    for kind in ProviderKind::ALL {
        router = router.route(
            &format!("/profile_{}", kind.route_suffix()),
            get(move |user: CurrentUser| async move { profile_page(kind, user) }),
        );
    }

    router
}

/// Render the stored principal, or bounce to the provider's login page
/// when the session is not authenticated.
fn profile_page(kind: ProviderKind, CurrentUser(user): CurrentUser) -> Response {
    match user {
        Some(principal) => HtmlPage(ProfileTemplate::new(kind, &principal)).into_response(),
        None => Redirect::to(&format!("/login_{}", kind.route_suffix())).into_response(),
    }
}
