//! Live session tracking.

pub mod manager;

pub use manager::SessionManager;
