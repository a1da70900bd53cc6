//! Integration tests for the Ferrum authorization engine.

mod grant_test;
mod helpers;
mod store_test;
