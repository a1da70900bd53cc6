//! Salted SHA-512 password hashing and verification.
//!
//! Hashes are `base64url(sha512(password || salt))` with padding. The format
//! is shared with existing deployments, so it must not change.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use rand::Rng;
use sha2::{Digest, Sha512};

use ferrum_entity::realm::Realm;

/// Alphabet realm salts are drawn from.
const SALT_CHARSET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()_+=";

/// Length of a generated salt.
const SALT_LENGTH: usize = 32;

/// Output length of SHA-512.
const DIGEST_LENGTH: usize = 64;

/// Generate a fresh random realm salt.
pub fn generate_salt() -> String {
    let mut rng = rand::thread_rng();
    (0..SALT_LENGTH)
        .map(|_| SALT_CHARSET[rng.gen_range(0..SALT_CHARSET.len())] as char)
        .collect()
}

/// Hashes and verifies passwords under one realm salt.
#[derive(Clone)]
pub struct PasswordEncoder {
    salt: String,
}

impl std::fmt::Debug for PasswordEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordEncoder").finish_non_exhaustive()
    }
}

impl PasswordEncoder {
    /// Creates an encoder for the given salt.
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    /// Creates the encoder of a realm.
    pub fn for_realm(realm: &Realm) -> Self {
        Self::new(realm.password_salt.clone())
    }

    /// Hashes a plaintext password.
    pub fn hash(&self, password: &str) -> String {
        URL_SAFE.encode(self.digest(password))
    }

    /// Verifies a plaintext password against a stored hash.
    ///
    /// The comparison touches every byte regardless of where the first
    /// mismatch is. Hashes that are not valid base64 never match.
    pub fn matches(&self, password: &str, hash: &str) -> bool {
        let candidate = self.digest(password);
        match URL_SAFE.decode(hash) {
            Ok(stored) => constant_time_eq(&candidate, &stored),
            Err(_) => false,
        }
    }

    /// Whether `value` has the shape of a hash produced by this encoder.
    pub fn looks_hashed(value: &str) -> bool {
        URL_SAFE
            .decode(value)
            .is_ok_and(|bytes| bytes.len() == DIGEST_LENGTH)
    }

    fn digest(&self, password: &str) -> Vec<u8> {
        let mut hasher = Sha512::new();
        hasher.update(password.as_bytes());
        hasher.update(self.salt.as_bytes());
        hasher.finalize().to_vec()
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
