//! Request and response shapes of the authorization engine.

pub mod discovery;
pub mod error;
pub mod introspect;
pub mod token;

pub use discovery::OpenIdConfiguration;
pub use error::ErrorDetails;
pub use introspect::{Audience, IntrospectTokenResult};
pub use token::{TokenGenerationData, TokenResponse};
