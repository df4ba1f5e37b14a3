//! # clinic_core
//!
//! Core domain logic for the ABClinic portal: credentials, tokens, refresh
//! token rotation, role-based access policy and the stores behind them.

pub mod auth;
pub mod dentists;
pub mod migrate;
pub mod models;
pub mod rbac;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
