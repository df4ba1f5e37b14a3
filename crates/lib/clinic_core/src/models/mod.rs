//! Domain models shared across `clinic_core` and `clinic_api`.

pub mod auth;
pub mod dentists;
