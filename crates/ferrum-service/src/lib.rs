//! # ferrum-service
//!
//! The authorization engine of Ferrum. It validates clients and user
//! credentials against an [`IdentityStore`](ferrum_store::IdentityStore),
//! runs sessions through the [`SessionManager`](ferrum_auth::SessionManager)
//! and mints tokens with the JWT codec.
//!
//! The engine is transport-agnostic: it takes and returns the DTOs in
//! [`dto`], and errors carry an [`ErrorKind`](ferrum_core::ErrorKind) the
//! transport layer maps to a status code.

pub mod dto;
pub mod engine;

pub use dto::{
    Audience, ErrorDetails, IntrospectTokenResult, OpenIdConfiguration, TokenGenerationData,
    TokenResponse,
};
pub use engine::AuthorizationEngine;
