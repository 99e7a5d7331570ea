//! stworld: a multi-provider social login demo server
//!
//! Four identity providers (Facebook, Twitter, LINE, Google) behind one
//! axum application: per-provider login pages, a generic initiate/callback
//! flow, guarded profile pages, and a trivial JSON API. The authenticated
//! identity is the provider profile, held in an in-memory cookie session.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use stworld::{config::AppConfig, routes, server::Server, state::AppState};
//!
//! #[tokio::main]
//! async fn main() -> stworld::error::Result<()> {
//!     let config = AppConfig::load()?;
//!     stworld::observability::init_tracing(&config)?;
//!
//!     let state = AppState::new(config.clone())?;
//!     let app = routes::build_router(state);
//!
//!     Server::new(config).serve(app).await
//! }
//! ```
//!
//! Provider credentials come from the environment (`FB_CLIENT_ID`,
//! `FB_CLIENT_SECRET`, `TW_CONSUMER_KEY`, `TW_CONSUMER_SECRET`,
//! `GOOG_CLIENT_ID`, `GOOG_CLIENT_SECRET`, `LINE_CHANNEL_ID`,
//! `LINE_CHANNEL_SECRET`) or from `config.toml`; `PORT` sets the listen
//! port. A provider without credentials still serves its routes and fails
//! its flow with a redirect.

pub mod auth;
pub mod config;
pub mod error;
pub mod observability;
pub mod pages;
pub mod routes;
pub mod server;
pub mod session;
pub mod state;

pub use auth::{OAuthProvider, OAuthTokens, Principal, ProviderKind, ProviderRegistry};
pub use config::AppConfig;
pub use error::{Error, Result};
pub use session::{CurrentUser, FlowSession, IdentityCodec, PrincipalCodec};
pub use state::AppState;
