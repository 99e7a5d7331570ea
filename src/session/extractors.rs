//! Session extractors for the authentication flow

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{Principal, StateData};
use crate::error::Error;
use crate::session::codec::PrincipalCodec;
use crate::state::AppState;

use tower_sessions::Session;

/// Handle on the caller's session for the authentication flow: pending CSRF
/// state and the stored principal.
pub struct FlowSession {
    session: Session,
}

impl FlowSession {
    const STATE_KEY: &'static str = "oauth.state";
    const PRINCIPAL_KEY: &'static str = "auth.principal";

    /// Store pending flow state, replacing any previous pending flow
    pub async fn set_state(&self, data: &StateData) -> Result<(), Error> {
        self.session
            .insert(Self::STATE_KEY, data)
            .await
            .map_err(|e| Error::Session(format!("Failed to store flow state: {e}")))
    }

    /// Remove and return the pending flow state, if any.
    ///
    /// Consuming on read means a state value can never validate twice.
    pub async fn take_state(&self) -> Result<Option<StateData>, Error> {
        self.session
            .remove(Self::STATE_KEY)
            .await
            .map_err(|e| Error::Session(format!("Failed to read flow state: {e}")))
    }

    /// Store the authenticated principal through the codec
    pub async fn set_principal(
        &self,
        codec: &dyn PrincipalCodec,
        principal: &Principal,
    ) -> Result<(), Error> {
        let value = codec.encode(principal).await?;
        self.session
            .insert(Self::PRINCIPAL_KEY, &value)
            .await
            .map_err(|e| Error::Session(format!("Failed to store principal: {e}")))
    }

    /// Restore the authenticated principal through the codec, if present
    pub async fn principal(&self, codec: &dyn PrincipalCodec) -> Result<Option<Principal>, Error> {
        let value: Option<serde_json::Value> = self
            .session
            .get(Self::PRINCIPAL_KEY)
            .await
            .map_err(|e| Error::Session(format!("Failed to read principal: {e}")))?;

        match value {
            Some(value) => Ok(Some(codec.decode(value).await?)),
            None => Ok(None),
        }
    }

    /// Regenerate the session ID.
    ///
    /// Called after a successful login to prevent session fixation.
    pub async fn regenerate(&self) -> Result<(), Error> {
        self.session
            .cycle_id()
            .await
            .map_err(|e| Error::Session(format!("Failed to regenerate session ID: {e}")))
    }

    /// Destroy the session entirely (logout)
    pub async fn destroy(&self) -> Result<(), Error> {
        self.session
            .flush()
            .await
            .map_err(|e| Error::Session(format!("Failed to destroy session: {e}")))
    }
}

impl<S> FromRequestParts<S> for FlowSession
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts.extensions.get::<Session>().cloned().ok_or_else(|| {
            Error::Session(
                "Session not found in request extensions. Is SessionManagerLayer configured?"
                    .to_string(),
            )
        })?;

        Ok(Self { session })
    }
}

/// The authenticated principal for this request, if any.
///
/// A session value that fails to decode counts as unauthenticated rather
/// than failing the request.
pub struct CurrentUser(pub Option<Principal>);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let flow = FlowSession::from_request_parts(parts, state).await?;

        match flow.principal(state.codec().as_ref()).await {
            Ok(principal) => Ok(CurrentUser(principal)),
            Err(err) => {
                tracing::warn!("Stored session principal unreadable: {err}");
                Ok(CurrentUser(None))
            }
        }
    }
}
