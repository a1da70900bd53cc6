//! Password hashing.

pub mod hasher;

pub use hasher::{PasswordEncoder, generate_salt};
