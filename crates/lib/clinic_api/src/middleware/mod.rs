//! Request middleware: identity extraction and authorization.

pub mod auth;
pub mod authorize;
