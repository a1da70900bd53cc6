//! Token introspection, userinfo and discovery.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use ferrum_core::ErrorKind;
use ferrum_core::error::AppError;
use ferrum_core::result::AppResult;
use ferrum_entity::session::UserSession;

use super::AuthorizationEngine;
use crate::dto::error::INVALID_TOKEN_DESC;
use crate::dto::{IntrospectTokenResult, OpenIdConfiguration};

impl AuthorizationEngine {
    /// Reports whether `token` is a live access token of `realm`.
    ///
    /// Unknown, expired and forged tokens are inactive, not errors. Only a
    /// missing realm or a store failure fails the call.
    pub async fn introspect(&self, realm: &str, token: &str) -> AppResult<IntrospectTokenResult> {
        self.store.get_realm(realm).await?;

        let Some(session) = self.live_session(realm, token) else {
            return Ok(IntrospectTokenResult::inactive());
        };

        match self.decoder.decode(token) {
            Ok(claims) => Ok(IntrospectTokenResult::from_claims(&claims)),
            Err(e) => {
                debug!(realm = %realm, session_id = %session.id, error = %e, "Introspected token is invalid");
                Ok(IntrospectTokenResult::inactive())
            }
        }
    }

    /// Public info of the user a live access token was issued to.
    pub async fn userinfo(&self, realm: &str, token: &str) -> AppResult<Map<String, Value>> {
        self.store.get_realm(realm).await?;
        let rejected = || AppError::unauthorized(INVALID_TOKEN_DESC);

        let session = self.live_session(realm, token).ok_or_else(|| {
            warn!(realm = %realm, "Userinfo requested with an unknown or expired token");
            rejected()
        })?;
        self.decoder.decode(token).map_err(|e| {
            warn!(realm = %realm, session_id = %session.id, error = %e, "Userinfo token rejected");
            rejected()
        })?;

        match self.store.get_user_by_id(realm, session.user_id).await {
            Ok(user) => Ok(user.public_info()),
            Err(e) if e.is(ErrorKind::NotFound) || e.is(ErrorKind::ZeroLength) => {
                warn!(realm = %realm, user_id = %session.user_id, "Session user is gone");
                Err(rejected())
            }
            Err(e) => Err(e),
        }
    }

    /// Discovery document of `realm`.
    pub async fn openid_configuration(&self, realm: &str) -> AppResult<OpenIdConfiguration> {
        self.store.get_realm(realm).await?;
        Ok(OpenIdConfiguration::for_issuer(&self.issuer(realm)))
    }

    fn live_session(&self, realm: &str, token: &str) -> Option<UserSession> {
        self.sessions
            .get_session_by_access_token(realm, token)
            .filter(|s| !s.is_access_expired())
    }
}
