//! Role-based access control.
//!
//! A policy rule is a `(role, route template, method pattern)` triple that
//! grants one action. Rules are collected into a [`PolicyTable`] before the
//! server starts, then compiled once into an immutable [`PolicyEnforcer`].
//! Anything not granted is denied.

pub mod enforcer;
pub mod file;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::auth::{Role, UnknownRole};

pub use enforcer::PolicyEnforcer;

/// Policy errors.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("invalid method pattern '{pattern}': {source}")]
    InvalidMethodPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error(transparent)]
    UnknownRole(#[from] UnknownRole),

    #[error("malformed policy line {line}: {reason}")]
    Malformed { line: u64, reason: String },

    #[error("policy file IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("policy file CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One permitted action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PolicyRule {
    pub role: Role,
    /// Route template as mounted, e.g. `/v1/dentists/{id}`.
    pub path: String,
    /// Exact method or a regex alternation such as `(PUT)|(DELETE)`.
    pub method: String,
}

impl PolicyRule {
    pub fn new(role: Role, path: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            role,
            path: path.into(),
            method: method.into(),
        }
    }
}

/// Ordered, duplicate-free collection of rules awaiting compilation.
#[derive(Debug, Clone, Default)]
pub struct PolicyTable {
    rules: Vec<PolicyRule>,
}

impl PolicyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule unless an identical one is already present.
    pub fn push(&mut self, rule: PolicyRule) -> bool {
        if self.rules.contains(&rule) {
            return false;
        }
        self.rules.push(rule);
        true
    }

    /// Append rules in order, skipping duplicates. Returns how many were added.
    pub fn extend(&mut self, rules: impl IntoIterator<Item = PolicyRule>) -> usize {
        rules.into_iter().filter(|r| self.push(r.clone())).count()
    }

    pub fn rules(&self) -> &[PolicyRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<PolicyRule> for PolicyTable {
    fn from_iter<I: IntoIterator<Item = PolicyRule>>(iter: I) -> Self {
        let mut table = PolicyTable::new();
        table.extend(iter);
        table
    }
}
