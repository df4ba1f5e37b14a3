//! Route templates.
//!
//! Every mounted path and every policy rule refers to these constants, so the
//! template the router matches is exactly the string the enforcer compares.

pub const GET_HEALTH: &str = "/health";

// Auth (public)
pub const POST_V1_LOGIN: &str = "/v1/login";
pub const POST_V1_REFRESH: &str = "/v1/refresh";
pub const POST_V1_LOGOUT: &str = "/v1/logout";

// Dentists
pub const V1_DENTISTS: &str = "/v1/dentists";
pub const V1_DENTISTS_ID: &str = "/v1/dentists/{id}";

// RBAC user management
pub const V1_RBAC_ROLES: &str = "/v1/rbac/roles";
pub const V1_RBAC_USER: &str = "/v1/rbac/user";
pub const V1_RBAC_USERS: &str = "/v1/rbac/users";
pub const V1_RBAC_USER_ID: &str = "/v1/rbac/user/{id}";

// Content modules. Their handlers are served elsewhere; the templates are
// listed here so their access rules are registered with the rest.
pub const V1_SERVICES: &str = "/v1/services";
pub const V1_SERVICES_ID: &str = "/v1/services/{id}";
pub const V1_SERVICES_GROUP_ID: &str = "/v1/services/{group_id}";
pub const V1_SERVICES_GROUPS: &str = "/v1/services/groups";
pub const V1_SERVICES_GROUPS_ID: &str = "/v1/services/groups/{id}";
pub const V1_ARTICLES: &str = "/v1/articles";
pub const V1_ARTICLES_ID: &str = "/v1/articles/{id}";
pub const V1_ARTICLES_CHAPTER: &str = "/v1/articles/chapter";
pub const V1_ARTICLES_CHAPTER_ID: &str = "/v1/articles/chapter/{id}";
pub const V1_BLOGS: &str = "/v1/blogs";
pub const V1_BLOGS_ID: &str = "/v1/blogs/{id}";
pub const V1_BLOGS_ID_PUBLICATION: &str = "/v1/blogs/{id}/publication";
pub const V1_BLOGS_PUBLICATION_ID: &str = "/v1/blogs/publication/{id}";
pub const V1_AUTHORS: &str = "/v1/authors";
pub const V1_AUTHORS_ID: &str = "/v1/authors/{id}";
pub const V1_FILE: &str = "/v1/file";
