//! Access rules contributed by each resource module.
//!
//! Every gated route needs at least one rule here; anything without a rule is
//! denied. Methods are either a single verb or an alternation such as
//! `(PUT)|(DELETE)`.

use clinic_core::models::auth::Role::{self, Admin, Dentist, Secretary, Website};
use clinic_core::rbac::{PolicyRule, PolicyTable};

use crate::routes;

fn rules(entries: &[(Role, &str, &str)]) -> Vec<PolicyRule> {
    entries
        .iter()
        .map(|&(role, path, method)| PolicyRule::new(role, path, method))
        .collect()
}

pub fn dentists() -> Vec<PolicyRule> {
    rules(&[(Admin, routes::V1_DENTISTS_ID, "PUT")])
}

pub fn rbac() -> Vec<PolicyRule> {
    rules(&[
        (Admin, routes::V1_RBAC_ROLES, "GET"),
        (Admin, routes::V1_RBAC_USER, "GET"),
        (Admin, routes::V1_RBAC_USERS, "GET"),
        (Admin, routes::V1_RBAC_USER, "POST"),
        (Admin, routes::V1_RBAC_USER_ID, "PUT"),
        (Admin, routes::V1_RBAC_USER_ID, "DELETE"),
        (Dentist, routes::V1_RBAC_ROLES, "GET"),
        (Dentist, routes::V1_RBAC_USER, "GET"),
        (Secretary, routes::V1_RBAC_ROLES, "GET"),
        (Secretary, routes::V1_RBAC_USER, "GET"),
    ])
}

/// Price list: services and service groups.
pub fn services() -> Vec<PolicyRule> {
    let mut all = Vec::new();
    for role in [Admin, Secretary] {
        all.extend(rules(&[
            (role, routes::V1_SERVICES_GROUP_ID, "GET"),
            (role, routes::V1_SERVICES, "POST"),
            (role, routes::V1_SERVICES_ID, "(PUT)|(DELETE)"),
            (role, routes::V1_SERVICES_GROUPS, "GET"),
            (role, routes::V1_SERVICES_GROUPS_ID, "GET"),
            (role, routes::V1_SERVICES_GROUPS, "POST"),
            (role, routes::V1_SERVICES_GROUPS_ID, "(PUT)|(DELETE)"),
        ]));
    }
    for role in [Website, Dentist] {
        all.extend(rules(&[
            (role, routes::V1_SERVICES_GROUP_ID, "GET"),
            (role, routes::V1_SERVICES_GROUPS, "GET"),
            (role, routes::V1_SERVICES_GROUPS_ID, "GET"),
        ]));
    }
    all
}

/// Articles and their chapters.
pub fn articles() -> Vec<PolicyRule> {
    let mut all = Vec::new();
    for role in [Admin, Secretary] {
        all.extend(rules(&[
            (role, routes::V1_ARTICLES, "POST"),
            (role, routes::V1_ARTICLES_ID, "PUT"),
            (role, routes::V1_ARTICLES_ID, "DELETE"),
            (role, routes::V1_ARTICLES_CHAPTER, "POST"),
            (role, routes::V1_ARTICLES_CHAPTER_ID, "PUT"),
            (role, routes::V1_ARTICLES_CHAPTER_ID, "DELETE"),
        ]));
    }
    all
}

pub fn blogs() -> Vec<PolicyRule> {
    let mut all = Vec::new();
    for role in [Admin, Dentist] {
        all.extend(rules(&[
            (role, routes::V1_BLOGS, "POST"),
            (role, routes::V1_BLOGS_ID, "(PUT)|(DELETE)"),
            (role, routes::V1_BLOGS_ID_PUBLICATION, "POST"),
            (role, routes::V1_BLOGS_PUBLICATION_ID, "(PUT)|(DELETE)"),
        ]));
    }
    all
}

pub fn authors() -> Vec<PolicyRule> {
    let mut all = Vec::new();
    for role in [Admin, Dentist] {
        all.extend(rules(&[
            (role, routes::V1_AUTHORS, "POST"),
            (role, routes::V1_AUTHORS_ID, "(PUT)|(DELETE)"),
        ]));
    }
    all
}

/// File uploads.
pub fn files() -> Vec<PolicyRule> {
    rules(&[
        (Admin, routes::V1_FILE, "(POST)|(DELETE)"),
        (Secretary, routes::V1_FILE, "(POST)|(DELETE)"),
        (Dentist, routes::V1_FILE, "(POST)|(DELETE)"),
    ])
}

/// Every built-in rule, in registration order.
pub fn all() -> PolicyTable {
    let mut table = PolicyTable::new();
    for contribution in [
        dentists(),
        services(),
        articles(),
        blogs(),
        authors(),
        files(),
        rbac(),
    ] {
        table.extend(contribution);
    }
    table
}
