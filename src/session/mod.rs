//! Cookie-based session management
//!
//! Sessions are held in the in-memory store and identified by a
//! server-generated session ID carried in a cookie; everything is lost on
//! restart, which is the intended lifetime for this demo. The stored value
//! for an authenticated session is the encoded [`Principal`], written and
//! read through the pluggable [`PrincipalCodec`] seam.
//!
//! [`Principal`]: crate::auth::Principal
//! [`PrincipalCodec`]: codec::PrincipalCodec

mod codec;
mod extractors;

pub use codec::{IdentityCodec, PrincipalCodec};
pub use extractors::{CurrentUser, FlowSession};

pub use tower_sessions::{Expiry, Session, SessionManagerLayer};
pub use tower_sessions_memory_store::MemoryStore;

use time::Duration;

use crate::config::SessionConfig;

/// Create a `SessionManagerLayer` over the in-memory store from configuration.
///
/// Applied to the router ahead of `with_state`; handlers reach the session
/// through the extractors in this module.
pub fn create_memory_session_layer(config: &SessionConfig) -> SessionManagerLayer<MemoryStore> {
    use tower_sessions::cookie::SameSite;

    let store = MemoryStore::default();

    let expiry = if config.expiry_secs == 0 {
        Expiry::OnSessionEnd
    } else {
        Expiry::OnInactivity(Duration::seconds(config.expiry_secs as i64))
    };

    let same_site = match config.same_site.to_lowercase().as_str() {
        "strict" => SameSite::Strict,
        "none" => SameSite::None,
        _ => SameSite::Lax,
    };

    SessionManagerLayer::new(store)
        .with_name(config.cookie_name.clone())
        .with_expiry(expiry)
        .with_secure(config.secure)
        .with_http_only(config.http_only)
        .with_same_site(same_site)
        .with_path(config.cookie_path.clone())
}
