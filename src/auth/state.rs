//! CSRF state for the authorization flow
//!
//! A random state value is generated at initiate, stored in the caller's
//! session, and checked against the `state` query parameter on return. An
//! absent, mismatched, or expired state fails the flow.

use serde::{Deserialize, Serialize};

/// How long a pending authorization flow stays valid
const STATE_TTL_SECS: i64 = 600;

/// Data stored in the session between initiate and callback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateData {
    /// Provider name the flow was started for
    pub provider: String,

    /// Random state value carried through the provider redirect
    pub value: String,

    /// When this state was created (Unix timestamp)
    pub created_at: i64,
}

impl StateData {
    /// Create fresh state for a provider flow
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            value: generate_state(),
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Whether the pending flow has outlived its TTL
    pub fn is_expired(&self) -> bool {
        chrono::Utc::now().timestamp() - self.created_at > STATE_TTL_SECS
    }
}

/// Generate a cryptographically secure random state value
pub fn generate_state() -> String {
    use rand::Rng;
    let bytes: [u8; 32] = rand::rng().random();
    base64_url_encode(&bytes)
}

/// Base64 URL-safe encoding without padding
fn base64_url_encode(bytes: &[u8]) -> String {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_state_uniqueness() {
        let state1 = generate_state();
        let state2 = generate_state();
        assert_ne!(state1, state2);
        // Base64 URL-safe encoding of 32 bytes = 43 chars (without padding)
        assert_eq!(state1.len(), 43);
    }

    #[test]
    fn test_fresh_state_is_not_expired() {
        let data = StateData::new("google");
        assert_eq!(data.provider, "google");
        assert!(!data.is_expired());
    }

    #[test]
    fn test_old_state_is_expired() {
        let mut data = StateData::new("google");
        data.created_at -= STATE_TTL_SECS + 1;
        assert!(data.is_expired());
    }

    #[test]
    fn test_state_data_serialization() {
        let data = StateData::new("line");
        let json = serde_json::to_string(&data).unwrap();
        let parsed: StateData = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.provider, "line");
        assert_eq!(parsed.value, data.value);
        assert_eq!(parsed.created_at, data.created_at);
    }
}
