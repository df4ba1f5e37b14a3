//! Request handlers.

pub mod auth;
pub mod dentists;
pub mod health;
pub mod rbac;
