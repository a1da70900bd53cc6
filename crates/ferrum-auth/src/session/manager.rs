//! In-process session table, one list of sessions per realm.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use ferrum_entity::session::UserSession;

/// Tracks live sessions per realm.
///
/// Each realm's list lives in one [`DashMap`] entry, so every read and
/// update of that list runs under the entry's shard lock. Sessions are
/// never evicted; callers check expiry on use. A restart drops all sessions.
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: DashMap<String, Vec<UserSession>>,
}

impl SessionManager {
    /// Creates an empty session table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session for `user_id` or renews the existing one.
    ///
    /// A renewed session keeps its id; its start time and both expiry
    /// windows are reset from now.
    pub fn start_or_update_session(
        &self,
        realm: &str,
        user_id: Uuid,
        access_duration_secs: u64,
        refresh_duration_secs: u64,
    ) -> Uuid {
        let now = Utc::now();
        let expired = expiry(now, access_duration_secs);
        let refresh_expired = expiry(now, refresh_duration_secs);

        let mut realm_sessions = self.sessions.entry(realm.to_string()).or_default();

        if let Some(session) = realm_sessions.iter_mut().find(|s| s.user_id == user_id) {
            session.started = now;
            session.expired = expired;
            session.refresh_expired = refresh_expired;
            debug!(realm = %realm, user_id = %user_id, session_id = %session.id, "Session renewed");
            return session.id;
        }

        let session = UserSession {
            id: Uuid::new_v4(),
            user_id,
            started: now,
            expired,
            refresh_expired,
            access_token: String::new(),
            refresh_token: String::new(),
        };
        let id = session.id;
        realm_sessions.push(session);
        debug!(realm = %realm, user_id = %user_id, session_id = %id, "Session started");
        id
    }

    /// Stores the tokens issued for a user's session. No-op without one.
    pub fn assign_tokens(&self, realm: &str, user_id: Uuid, access_token: &str, refresh_token: &str) {
        if let Some(mut realm_sessions) = self.sessions.get_mut(realm) {
            if let Some(session) = realm_sessions.iter_mut().find(|s| s.user_id == user_id) {
                session.access_token = access_token.to_string();
                session.refresh_token = refresh_token.to_string();
            }
        }
    }

    /// Session of a user.
    pub fn get_session(&self, realm: &str, user_id: Uuid) -> Option<UserSession> {
        self.find(realm, |s| s.user_id == user_id)
    }

    /// Session whose last issued access token is `token`.
    pub fn get_session_by_access_token(&self, realm: &str, token: &str) -> Option<UserSession> {
        self.find(realm, |s| !token.is_empty() && s.access_token == token)
    }

    /// Session whose last issued refresh token is `token`.
    pub fn get_session_by_refresh_token(&self, realm: &str, token: &str) -> Option<UserSession> {
        self.find(realm, |s| !token.is_empty() && s.refresh_token == token)
    }

    /// `(access_expired, refresh_expired)` for a user's session.
    ///
    /// A missing session reports both windows as expired.
    pub fn check_session_and_refresh_expired(&self, realm: &str, user_id: Uuid) -> (bool, bool) {
        match self.get_session(realm, user_id) {
            Some(session) => (session.is_access_expired(), session.is_refresh_expired()),
            None => (true, true),
        }
    }

    /// Number of sessions tracked for a realm.
    pub fn realm_session_count(&self, realm: &str) -> usize {
        self.sessions.get(realm).map_or(0, |s| s.len())
    }

    fn find(&self, realm: &str, predicate: impl Fn(&UserSession) -> bool) -> Option<UserSession> {
        self.sessions
            .get(realm)
            .and_then(|sessions| sessions.iter().find(|s| predicate(s)).cloned())
    }
}

fn expiry(now: DateTime<Utc>, secs: u64) -> DateTime<Utc> {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|d| now.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
