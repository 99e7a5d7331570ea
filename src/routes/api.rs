//! JSON API sub-router

use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Body of the API welcome response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiWelcome {
    pub message: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(welcome))
}

/// Health-check route, reachable without authentication
async fn welcome() -> Json<ApiWelcome> {
    Json(ApiWelcome {
        message: "hooray! welcome to our api!".to_string(),
    })
}
