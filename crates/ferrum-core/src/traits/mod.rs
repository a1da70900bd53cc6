//! Core traits defined in `ferrum-core` and implemented by other crates.

pub mod kv;

pub use kv::KeyValueStore;
