//! HS256 token generation.

use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Map, Value};

use ferrum_core::error::{AppError, ErrorKind};
use ferrum_core::result::AppResult;
use ferrum_entity::session::UserSession;
use ferrum_entity::user::UserDocument;

use super::claims::JwtCommonInfo;

/// Creates signed access and refresh tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder").finish_non_exhaustive()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from the server signing key.
    pub fn new(signing_key: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(signing_key),
        }
    }

    /// Signs an access token: the common claims merged with the user's
    /// public info. Keys present in both take the info value.
    pub fn generate_access_token(
        &self,
        issuer: &str,
        token_type: &str,
        scope: &str,
        session: &UserSession,
        user: &UserDocument,
    ) -> AppResult<String> {
        let common = JwtCommonInfo::for_access(issuer, token_type, scope, session);
        let claims = merge_claims(&common, user.public_info())?;

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            AppError::with_source(ErrorKind::Token, "Failed to encode access token", e)
        })
    }

    /// Signs a refresh token carrying the common claims only.
    pub fn generate_refresh_token(
        &self,
        issuer: &str,
        token_type: &str,
        scope: &str,
        session: &UserSession,
    ) -> AppResult<String> {
        let claims = JwtCommonInfo::for_refresh(issuer, token_type, scope, session);

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            AppError::with_source(ErrorKind::Token, "Failed to encode refresh token", e)
        })
    }
}

fn merge_claims(common: &JwtCommonInfo, info: Map<String, Value>) -> AppResult<Value> {
    let Value::Object(mut merged) = serde_json::to_value(common)? else {
        return Err(AppError::internal("common claims did not serialize to an object"));
    };
    merged.extend(info);
    Ok(Value::Object(merged))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use serde_json::json;
    use uuid::Uuid;

    use crate::jwt::claims::{TOKEN_TYPE_BEARER, TOKEN_TYPE_REFRESH};
    use crate::jwt::decoder::JwtDecoder;

    const KEY: &[u8] = b"qwerty1234567890";
    const ISSUER: &str = "http://localhost:8182/auth/realms/r1";

    fn make_session() -> UserSession {
        let now = Utc::now();
        UserSession {
            id: Uuid::new_v4(),
            user_id: Uuid::parse_str("667ff6a7-3f6b-449b-a217-6fc5d9ac0723").unwrap(),
            started: now,
            expired: now + Duration::seconds(300),
            refresh_expired: now + Duration::seconds(600),
            access_token: String::new(),
            refresh_token: String::new(),
        }
    }

    fn make_user(extra: Value) -> UserDocument {
        let mut info = json!({
            "sub": "667ff6a7-3f6b-449b-a217-6fc5d9ac0723",
            "preferred_username": "alice",
            "email": "alice@example.com"
        });
        if let (Value::Object(info), Value::Object(extra)) = (&mut info, extra) {
            info.extend(extra);
        }
        UserDocument::new(json!({"info": info, "credentials": {"password": "hash"}})).unwrap()
    }

    #[test]
    fn test_access_token_merges_public_info() {
        let encoder = JwtEncoder::new(KEY);
        let session = make_session();
        let token = encoder
            .generate_access_token(ISSUER, TOKEN_TYPE_BEARER, "profile email", &session, &make_user(json!({})))
            .unwrap();
        assert_eq!(token.split('.').count(), 3);

        let claims = JwtDecoder::new(KEY).decode(&token).unwrap();
        assert_eq!(claims["aud"], "account");
        assert_eq!(claims["iss"], ISSUER);
        assert_eq!(claims["typ"], "Bearer");
        assert_eq!(claims["scope"], "profile email");
        assert_eq!(claims["sid"], session.id.to_string());
        assert_eq!(claims["session_state"], session.id.to_string());
        assert_eq!(claims["preferred_username"], "alice");
        assert_eq!(claims["email"], "alice@example.com");
        assert_eq!(claims["exp"], session.expired.timestamp());
        assert!(!claims.contains_key("credentials"));
        assert!(!claims.contains_key("password"));
    }

    #[test]
    fn test_info_wins_on_collision() {
        let encoder = JwtEncoder::new(KEY);
        let token = encoder
            .generate_access_token(
                ISSUER,
                TOKEN_TYPE_BEARER,
                "profile",
                &make_session(),
                &make_user(json!({"scope": "from-info"})),
            )
            .unwrap();
        let claims = JwtDecoder::new(KEY).decode(&token).unwrap();
        assert_eq!(claims["scope"], "from-info");
    }

    #[test]
    fn test_refresh_token_audience_is_issuer() {
        let encoder = JwtEncoder::new(KEY);
        let session = make_session();
        let token = encoder
            .generate_refresh_token(ISSUER, TOKEN_TYPE_REFRESH, "profile", &session)
            .unwrap();
        let claims = JwtDecoder::new(KEY).decode(&token).unwrap();
        assert_eq!(claims["aud"], ISSUER);
        assert_eq!(claims["typ"], "Refresh");
        assert_eq!(claims["exp"], session.refresh_expired.timestamp());
        assert!(!claims.contains_key("preferred_username"));
    }

    #[test]
    fn test_fresh_jti_per_token() {
        let encoder = JwtEncoder::new(KEY);
        let session = make_session();
        let decoder = JwtDecoder::new(KEY);
        let a = encoder
            .generate_refresh_token(ISSUER, TOKEN_TYPE_REFRESH, "", &session)
            .unwrap();
        let b = encoder
            .generate_refresh_token(ISSUER, TOKEN_TYPE_REFRESH, "", &session)
            .unwrap();
        assert_ne!(decoder.decode(&a).unwrap()["jti"], decoder.decode(&b).unwrap()["jti"]);
    }
}
