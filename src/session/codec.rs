//! Session codec: how a Principal is written to and read from the session
//!
//! The codec is the extension seam for replacing profile-in-session storage
//! with a real user record: a database-backed implementation would encode to
//! a user ID and decode by lookup. The default [`IdentityCodec`] stores the
//! profile as-is.

use async_trait::async_trait;
use serde_json::Value;

use crate::auth::Principal;
use crate::error::Error;

/// Serialize/deserialize pair used to store and recover a Principal across
/// requests
#[async_trait]
pub trait PrincipalCodec: Send + Sync {
    /// Serialize a Principal into the value held by the session store
    async fn encode(&self, principal: &Principal) -> Result<Value, Error>;

    /// Restore a Principal from the stored value
    async fn decode(&self, value: Value) -> Result<Principal, Error>;
}

/// The identity transform: the session holds the full profile
#[derive(Debug, Clone, Default)]
pub struct IdentityCodec;

#[async_trait]
impl PrincipalCodec for IdentityCodec {
    async fn encode(&self, principal: &Principal) -> Result<Value, Error> {
        serde_json::to_value(principal)
            .map_err(|e| Error::Session(format!("Failed to encode principal: {e}")))
    }

    async fn decode(&self, value: Value) -> Result<Principal, Error> {
        serde_json::from_value(value)
            .map_err(|e| Error::Session(format!("Failed to decode principal: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_principal() -> Principal {
        Principal {
            provider: "line".to_string(),
            provider_user_id: "U4af4980629".to_string(),
            display_name: Some("Brown".to_string()),
            email: None,
            picture: Some("https://profile.line-scdn.net/abc".to_string()),
            raw: serde_json::json!({
                "userId": "U4af4980629",
                "displayName": "Brown",
                "pictureUrl": "https://profile.line-scdn.net/abc",
                "statusMessage": "Hello, LINE!"
            }),
        }
    }

    #[tokio::test]
    async fn test_identity_round_trip() {
        let codec = IdentityCodec;
        let principal = sample_principal();

        let encoded = codec.encode(&principal).await.unwrap();
        let decoded = codec.decode(encoded).await.unwrap();

        assert_eq!(decoded, principal);
    }

    #[tokio::test]
    async fn test_decode_rejects_foreign_value() {
        let codec = IdentityCodec;
        let err = codec
            .decode(serde_json::json!({"not": "a principal"}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Session(_)));
    }
}
