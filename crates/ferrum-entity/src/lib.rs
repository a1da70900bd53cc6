//! # ferrum-entity
//!
//! Domain entities shared by the identity store, the token codec, and the
//! authorization engine.

pub mod client;
pub mod federation;
pub mod identifier;
pub mod realm;
pub mod server_data;
pub mod session;
pub mod user;

pub use client::{Authentication, AuthenticationType, Client, ClientType};
pub use federation::{UserFederationServiceConfig, UserFederationServiceType};
pub use identifier::ExtendedIdentifier;
pub use realm::Realm;
pub use server_data::ServerData;
pub use session::UserSession;
pub use user::UserDocument;
