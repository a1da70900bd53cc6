//! JWT token encoding, decoding, and claims.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::{JwtCommonInfo, TOKEN_TYPE_BEARER, TOKEN_TYPE_REFRESH};
pub use decoder::JwtDecoder;
pub use encoder::JwtEncoder;
