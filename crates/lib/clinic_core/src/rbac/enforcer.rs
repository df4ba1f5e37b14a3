//! Policy enforcer: compiled, read-only rule table.

use regex::Regex;
use tracing::debug;

use super::{PolicyError, PolicyRule, PolicyTable};
use crate::models::auth::Role;

#[derive(Debug)]
struct CompiledRule {
    rule: PolicyRule,
    /// `rule.method` anchored to the whole method name.
    method: Regex,
}

impl CompiledRule {
    fn compile(rule: PolicyRule) -> Result<Self, PolicyError> {
        let method = Regex::new(&format!("^(?:{})$", rule.method)).map_err(|source| {
            PolicyError::InvalidMethodPattern {
                pattern: rule.method.clone(),
                source,
            }
        })?;
        Ok(Self { rule, method })
    }

    fn matches(&self, role: Role, route: &str, method: &str) -> bool {
        self.rule.role == role
            && self.rule.path == route
            && (self.rule.method == method || self.method.is_match(method))
    }
}

/// Decides `(role, route template, method)` requests against a fixed rule set.
///
/// Built once before serving and shared read-only, so lookups take no lock.
#[derive(Debug)]
pub struct PolicyEnforcer {
    rules: Vec<CompiledRule>,
}

impl PolicyEnforcer {
    /// Compile every rule of `table`. Fails on the first invalid method pattern.
    pub fn new(table: PolicyTable) -> Result<Self, PolicyError> {
        let rules = table
            .rules()
            .iter()
            .cloned()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// `true` if some rule grants `method` on `route` to `role`.
    ///
    /// `route` is the matched route template (`/v1/services/{id}`), never the
    /// literal request path.
    pub fn is_allowed(&self, role: Role, route: &str, method: &str) -> bool {
        let allowed = self.rules.iter().any(|r| r.matches(role, route, method));
        debug!(%role, route, method, allowed, "policy decision");
        allowed
    }

    /// The rules in registration order.
    pub fn rules(&self) -> impl Iterator<Item = &PolicyRule> {
        self.rules.iter().map(|r| &r.rule)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
