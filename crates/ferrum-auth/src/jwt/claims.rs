//! Claims shared by access and refresh tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ferrum_entity::session::UserSession;

/// `typ` of access tokens.
pub const TOKEN_TYPE_BEARER: &str = "Bearer";
/// `typ` of refresh tokens.
pub const TOKEN_TYPE_REFRESH: &str = "Refresh";
/// `aud` of access tokens.
pub const ACCESS_AUDIENCE: &str = "account";

/// Common claim set of every token minted for a session.
///
/// The session id is carried twice, as `session_state` and `sid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JwtCommonInfo {
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Token id, fresh for every token.
    pub jti: Uuid,
    /// Token type.
    pub typ: String,
    /// Issuer: the realm base URL.
    pub iss: String,
    /// Audience.
    pub aud: String,
    /// Subject: the user id.
    pub sub: Uuid,
    /// Session id.
    pub session_state: Uuid,
    /// Session id.
    pub sid: Uuid,
    /// Granted scope.
    pub scope: String,
}

impl JwtCommonInfo {
    /// Claims of an access token for `session`.
    pub fn for_access(issuer: &str, token_type: &str, scope: &str, session: &UserSession) -> Self {
        Self::build(
            issuer,
            token_type,
            scope,
            session,
            ACCESS_AUDIENCE,
            session.expired.timestamp(),
        )
    }

    /// Claims of a refresh token for `session`. The audience is the issuer.
    pub fn for_refresh(issuer: &str, token_type: &str, scope: &str, session: &UserSession) -> Self {
        Self::build(
            issuer,
            token_type,
            scope,
            session,
            issuer,
            session.refresh_expired.timestamp(),
        )
    }

    fn build(
        issuer: &str,
        token_type: &str,
        scope: &str,
        session: &UserSession,
        audience: &str,
        exp: i64,
    ) -> Self {
        Self {
            iat: session.started.timestamp(),
            exp,
            jti: Uuid::new_v4(),
            typ: token_type.to_string(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            sub: session.user_id,
            session_state: session.id,
            sid: session.id,
            scope: scope.to_string(),
        }
    }
}
