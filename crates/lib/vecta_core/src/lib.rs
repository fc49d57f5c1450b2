//! # vecta_core
//!
//! Core domain logic for Vecta: wire models, token claims and form
//! validation. Nothing in this crate performs I/O.

pub mod auth;
pub mod models;
pub mod validation;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
