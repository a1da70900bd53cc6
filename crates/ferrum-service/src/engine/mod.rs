//! The authorization engine.
//!
//! - `grant`: client and credential validation, issuance, refresh
//! - `inspect`: introspection, userinfo and discovery

mod grant;
mod inspect;

use std::sync::Arc;

use ferrum_auth::jwt::{JwtDecoder, JwtEncoder};
use ferrum_auth::session::SessionManager;
use ferrum_core::config::ServerConfig;
use ferrum_store::IdentityStore;

/// Runs the OAuth2 grant flows of every realm.
///
/// Sessions live in the engine's [`SessionManager`] and are lost when the
/// engine is dropped. Identities come from the store and are read on every
/// request.
#[derive(Debug)]
pub struct AuthorizationEngine {
    store: Arc<dyn IdentityStore>,
    sessions: SessionManager,
    encoder: JwtEncoder,
    decoder: JwtDecoder,
    server: ServerConfig,
}

impl AuthorizationEngine {
    /// Creates an engine signing tokens with `signing_key`.
    pub fn new(store: Arc<dyn IdentityStore>, server: ServerConfig, signing_key: &[u8]) -> Self {
        Self {
            store,
            sessions: SessionManager::new(),
            encoder: JwtEncoder::new(signing_key),
            decoder: JwtDecoder::new(signing_key),
            server,
        }
    }

    /// The live session table.
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// The identity store the engine reads from.
    pub fn store(&self) -> &Arc<dyn IdentityStore> {
        &self.store
    }

    /// Issuer URL of tokens minted for `realm`.
    pub fn issuer(&self, realm: &str) -> String {
        self.server.issuer(realm)
    }
}
