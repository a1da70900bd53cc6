//! # ferrum-auth
//!
//! Credential and token primitives for the Ferrum authorization server.
//!
//! ## Modules
//!
//! - `password`: salted SHA-512 password encoder and salt generation
//! - `jwt`: HS256 access/refresh token generation and verification
//! - `session`: in-process per-realm session table

pub mod jwt;
pub mod password;
pub mod session;

pub use jwt::{JwtCommonInfo, JwtDecoder, JwtEncoder};
pub use password::PasswordEncoder;
pub use session::SessionManager;
