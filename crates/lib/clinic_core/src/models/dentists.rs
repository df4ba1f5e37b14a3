//! Dentist profile model.

use serde::{Deserialize, Serialize};

/// Dentist profile shown on the public site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dentist {
    pub id: i64,
    pub clone_name: String,
    /// Portrait image URL.
    pub url: String,
    pub priority: i16,
    pub side: String,
    pub name: String,
    pub info: String,
}

/// Editable subset of a dentist profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DentistUpdate {
    pub name: String,
    pub info: String,
    pub url: String,
}
