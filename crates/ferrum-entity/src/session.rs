//! Live user session model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A time-boxed grant held by one user in one realm.
///
/// Two windows expire independently: `expired` bounds the access token,
/// `refresh_expired` bounds the refresh token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSession {
    /// Session identifier, stable across refreshes.
    pub id: Uuid,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// When the current grant was issued.
    pub started: DateTime<Utc>,
    /// Access token expiry.
    pub expired: DateTime<Utc>,
    /// Refresh token expiry.
    pub refresh_expired: DateTime<Utc>,
    /// Last issued access token.
    pub access_token: String,
    /// Last issued refresh token.
    pub refresh_token: String,
}

impl UserSession {
    /// Whether the access window has elapsed.
    pub fn is_access_expired(&self) -> bool {
        self.expired <= Utc::now()
    }

    /// Whether the refresh window has elapsed.
    pub fn is_refresh_expired(&self) -> bool {
        self.refresh_expired <= Utc::now()
    }
}
