//! HS256 token verification.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde_json::{Map, Value};

use ferrum_core::error::{AppError, ErrorKind};
use ferrum_core::result::AppResult;

/// Verifies tokens signed by [`super::JwtEncoder`] with the same key.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from the server signing key.
    pub fn new(signing_key: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // Issuer and verifier share one clock.
        validation.leeway = 0;
        // Access and refresh tokens carry different audiences.
        validation.validate_aud = false;

        Self {
            decoding_key: DecodingKey::from_secret(signing_key),
            validation,
        }
    }

    /// Checks signature and expiry and returns every claim of the token.
    pub fn decode(&self, token: &str) -> AppResult<Map<String, Value>> {
        let data = decode::<Map<String, Value>>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                let message = match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => "Token has expired",
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => "Invalid token signature",
                    _ => "Invalid token",
                };
                AppError::with_source(ErrorKind::Token, message, e)
            })?;

        Ok(data.claims)
    }

    /// Whether the token has a valid signature and has not expired.
    pub fn is_active(&self, token: &str) -> bool {
        self.decode(token).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use ferrum_entity::session::UserSession;

    use crate::jwt::claims::TOKEN_TYPE_REFRESH;
    use crate::jwt::encoder::JwtEncoder;

    const ISSUER: &str = "http://localhost:8182/auth/realms/r1";

    fn make_session(refresh_in: i64) -> UserSession {
        let now = Utc::now();
        UserSession {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            started: now - Duration::seconds(120),
            expired: now + Duration::seconds(refresh_in),
            refresh_expired: now + Duration::seconds(refresh_in),
            access_token: String::new(),
            refresh_token: String::new(),
        }
    }

    #[test]
    fn test_valid_token_is_active() {
        let token = JwtEncoder::new(b"key")
            .generate_refresh_token(ISSUER, TOKEN_TYPE_REFRESH, "", &make_session(60))
            .unwrap();
        assert!(JwtDecoder::new(b"key").is_active(&token));
    }

    #[test]
    fn test_signature_mismatch_is_inactive() {
        let token = JwtEncoder::new(b"key")
            .generate_refresh_token(ISSUER, TOKEN_TYPE_REFRESH, "", &make_session(60))
            .unwrap();
        let err = JwtDecoder::new(b"other").decode(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Token);
        assert!(!JwtDecoder::new(b"other").is_active(&token));
    }

    #[test]
    fn test_expired_token_is_inactive() {
        let token = JwtEncoder::new(b"key")
            .generate_refresh_token(ISSUER, TOKEN_TYPE_REFRESH, "", &make_session(-30))
            .unwrap();
        let err = JwtDecoder::new(b"key").decode(&token).unwrap_err();
        assert_eq!(err.message, "Token has expired");
    }

    #[test]
    fn test_garbage_is_inactive() {
        let decoder = JwtDecoder::new(b"key");
        assert!(!decoder.is_active("not-a-token"));
        assert!(!decoder.is_active(""));
    }
}
