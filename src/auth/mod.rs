//! OAuth provider integration
//!
//! Each supported identity provider is wrapped in an [`OAuthProvider`]
//! adapter exposing the same three-step contract: build an authorization URL
//! (initiate), exchange the returned code for tokens, and fetch the profile
//! (complete). Verification is explicit and Result-based; there are no
//! continuation callbacks.

pub mod provider;
pub mod providers;
pub mod registry;
pub mod state;

pub use provider::{OAuthProvider, OAuthTokens, Principal};
pub use registry::{ProviderKind, ProviderRegistry};
pub use state::{generate_state, StateData};
