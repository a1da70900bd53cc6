//! Key builders for every object the read-write store persists.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the store uses. The layout is shared with existing
//! deployments and must stay stable.

/// Builds namespaced keys for one store instance.
#[derive(Debug, Clone)]
pub struct KeyBuilder {
    namespace: String,
}

impl KeyBuilder {
    /// Create a key builder for the given namespace.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// Namespace prefix of all keys.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    // ── Objects ────────────────────────────────────────────────

    /// Key of a realm record.
    pub fn realm(&self, realm: &str) -> String {
        format!("{}.realm_{realm}", self.namespace)
    }

    /// Key of a client record.
    pub fn client(&self, realm: &str, client: &str) -> String {
        format!("{}.{realm}_client_{client}", self.namespace)
    }

    /// Key of a user document.
    pub fn user(&self, realm: &str, username: &str) -> String {
        format!("{}.{realm}_user_{username}", self.namespace)
    }

    // ── Association lists ──────────────────────────────────────

    /// Key of the realm → clients association list.
    pub fn realm_clients(&self, realm: &str) -> String {
        format!("{}.realm_{realm}_clients", self.namespace)
    }

    /// Key of the realm → users association list.
    pub fn realm_users(&self, realm: &str) -> String {
        format!("{}.realm_{realm}_users", self.namespace)
    }

    /// Key of the realm → federation configs list.
    pub fn realm_user_federations(&self, realm: &str) -> String {
        format!("{}.realm_{realm}_user_federations", self.namespace)
    }
}
