//! Route-level integration tests
//!
//! The full router is driven in-process with `oneshot`. Provider network
//! calls are never exercised; the authenticated path is covered by merging
//! a test-only login route inside the session layer.

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, Request, Response, StatusCode},
    response::{IntoResponse, Redirect},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::Value;
use tower::ServiceExt;

use stworld::{
    config::AppConfig,
    routes::{app_router, build_router_with},
    session::{create_memory_session_layer, FlowSession},
    state::AppState,
    Principal,
};

/// The application with defaults: no provider credentials
fn test_app() -> Router {
    let config = AppConfig::default();
    let session_layer = create_memory_session_layer(&config.session);
    let state = AppState::new(config).unwrap();
    build_router_with(app_router(), state, session_layer)
}

/// The application plus a `/test/login/{provider}` route that stores a
/// principal in the session the way a completed callback does.
fn test_app_with_login() -> Router {
    let config = AppConfig::default();
    let session_layer = create_memory_session_layer(&config.session);
    let state = AppState::new(config).unwrap();

    let routes = app_router().route("/test/login/{provider}", get(test_login));
    build_router_with(routes, state, session_layer)
}

#[derive(Deserialize)]
struct TestLoginQuery {
    user: String,
}

async fn test_login(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(query): Query<TestLoginQuery>,
    flow: FlowSession,
) -> impl IntoResponse {
    let principal = sample_principal(&provider, &query.user);
    flow.regenerate().await.unwrap();
    flow.set_principal(state.codec().as_ref(), &principal)
        .await
        .unwrap();
    Redirect::to("/")
}

fn sample_principal(provider: &str, user_id: &str) -> Principal {
    Principal {
        provider: provider.to_string(),
        provider_user_id: user_id.to_string(),
        display_name: Some(format!("User {user_id}")),
        email: Some(format!("{user_id}@example.com")),
        picture: None,
        raw: serde_json::json!({ "id": user_id }),
    }
}

async fn send(app: &Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// The session cookie pair from a Set-Cookie header
fn session_cookie(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("response should set a session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("response should carry a Location header")
        .to_str()
        .unwrap()
}

async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_api_returns_exact_welcome_message() {
    let app = test_app();
    let response = send(&app, "/api", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, serde_json::json!({"message": "hooray! welcome to our api!"}));
}

#[tokio::test]
async fn test_api_ignores_authentication_state() {
    let app = test_app_with_login();

    let login = send(&app, "/test/login/google?user=g-1", None).await;
    let cookie = session_cookie(&login);

    let response = send(&app, "/api", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert_eq!(body, r#"{"message":"hooray! welcome to our api!"}"#);
}

#[tokio::test]
async fn test_login_pages_render_for_all_providers() {
    let app = test_app();

    for (path, name) in [
        ("/login_fb", "Facebook"),
        ("/login_tw", "Twitter"),
        ("/login_line", "LINE"),
        ("/login_google", "Google"),
    ] {
        let response = send(&app, path, None).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        let body = body_string(response).await;
        assert!(body.contains(name), "{path} should mention {name}");
    }
}

#[tokio::test]
async fn test_index_lists_login_links() {
    let app = test_app();
    let response = send(&app, "/", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    for suffix in ["fb", "tw", "line", "google"] {
        assert!(body.contains(&format!("/login_{suffix}")));
    }
}

#[tokio::test]
async fn test_initiate_redirects_without_credentials() {
    let app = test_app();

    // Missing credentials must never produce a 500 on initiate
    let response = send(&app, "/login/facebook", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let target = location(&response);
    assert!(target.starts_with("https://www.facebook.com/"));
    assert!(target.contains("state="));
    assert!(target.contains("redirect_uri="));
}

#[tokio::test]
async fn test_initiate_unknown_provider_is_404() {
    let app = test_app();
    let response = send(&app, "/login/github", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_callback_unknown_provider_is_404() {
    let app = test_app();
    let response = send(&app, "/login/github/return?code=x&state=y", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_callback_provider_denial_redirects_to_login() {
    let app = test_app();
    let response = send(&app, "/login/google/return?error=access_denied", None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_callback_without_pending_flow_redirects_to_login() {
    let mut config = AppConfig::default();
    config.providers.google.client_id = "id".to_string();
    config.providers.google.client_secret = "secret".to_string();
    let session_layer = create_memory_session_layer(&config.session);
    let state = AppState::new(config).unwrap();
    let app = build_router_with(app_router(), state, session_layer);

    // Credentials present, but no initiate happened in this session
    let response = send(&app, "/login/google/return?code=abc&state=xyz", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_callback_state_mismatch_redirects_to_login() {
    let mut config = AppConfig::default();
    config.providers.facebook.client_id = "id".to_string();
    config.providers.facebook.client_secret = "secret".to_string();
    let session_layer = create_memory_session_layer(&config.session);
    let state = AppState::new(config).unwrap();
    let app = build_router_with(app_router(), state, session_layer);

    let initiate = send(&app, "/login/facebook", None).await;
    assert_eq!(initiate.status(), StatusCode::SEE_OTHER);
    let cookie = session_cookie(&initiate);

    let response = send(
        &app,
        "/login/facebook/return?code=abc&state=not-the-issued-state",
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_login_entry_page_renders() {
    let app = test_app();
    let response = send(&app, "/login", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("/login_fb"));
}

#[tokio::test]
async fn test_profile_without_session_redirects_to_login_page() {
    let app = test_app();

    for (path, login_page) in [
        ("/profile_fb", "/login_fb"),
        ("/profile_tw", "/login_tw"),
        ("/profile_line", "/login_line"),
        ("/profile_google", "/login_google"),
    ] {
        let response = send(&app, path, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&response), login_page, "{path}");
    }
}

#[tokio::test]
async fn test_authenticated_session_renders_profile() {
    let app = test_app_with_login();

    let login = send(&app, "/test/login/line?user=U123", None).await;
    assert_eq!(login.status(), StatusCode::SEE_OTHER);
    let cookie = session_cookie(&login);

    let response = send(&app, "/profile_line", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("U123"));
    assert!(body.contains("User U123"));
    assert!(body.contains("U123@example.com"));
}

#[tokio::test]
async fn test_index_greets_authenticated_user() {
    let app = test_app_with_login();

    let login = send(&app, "/test/login/google?user=g-7", None).await;
    let cookie = session_cookie(&login);

    let body = body_string(send(&app, "/", Some(&cookie)).await).await;
    assert!(body.contains("User g-7"));
    assert!(body.contains("/logout"));
}

#[tokio::test]
async fn test_logout_clears_session() {
    let app = test_app_with_login();

    let login = send(&app, "/test/login/facebook?user=fb-1", None).await;
    let cookie = session_cookie(&login);

    let logout = send(&app, "/logout", Some(&cookie)).await;
    assert_eq!(logout.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&logout), "/");

    let response = send(&app, "/profile_fb", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login_fb");
}

#[tokio::test]
async fn test_concurrent_users_get_distinct_sessions() {
    let app = test_app_with_login();

    let (login_a, login_b) = tokio::join!(
        send(&app, "/test/login/google?user=alpha", None),
        send(&app, "/test/login/google?user=beta", None),
    );
    let cookie_a = session_cookie(&login_a);
    let cookie_b = session_cookie(&login_b);
    assert_ne!(cookie_a, cookie_b);

    let (profile_a, profile_b) = tokio::join!(
        send(&app, "/profile_google", Some(&cookie_a)),
        send(&app, "/profile_google", Some(&cookie_b)),
    );

    let body_a = body_string(profile_a).await;
    let body_b = body_string(profile_b).await;
    assert!(body_a.contains("alpha"));
    assert!(!body_a.contains("beta"));
    assert!(body_b.contains("beta"));
    assert!(!body_b.contains("alpha"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = test_app();
    let response = send(&app, "/nope", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
