//! Identity extraction and the authorization gate.

mod common;

use axum::http::{Method, StatusCode};
use clinic_core::auth::jwt::issue_token;
use serde_json::json;
use std::time::Duration;

use common::{SECRET, app, bearer};

#[tokio::test]
async fn admin_can_update_dentist() {
    let app = app().await;
    let (access, _) = app.login("admin").await;

    let (status, _) = app
        .send(
            Method::PUT,
            "/v1/dentists/42",
            Some(&bearer(&access)),
            Some(json!({ "name": "Dr. J. Smith", "info": "Orthodontics", "img": "" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.send(Method::GET, "/v1/dentists/42", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Dr. J. Smith");
}

#[tokio::test]
async fn website_role_is_forbidden_on_dentist_update() {
    let app = app().await;
    let (access, _) = app.login("site").await;

    let (status, body) = app
        .send(
            Method::PUT,
            "/v1/dentists/42",
            Some(&bearer(&access)),
            Some(json!({ "name": "x" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn public_route_needs_no_authorization_header() {
    let app = app().await;
    let (status, body) = app.send(Method::GET, "/v1/dentists/42", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 42);
    assert_eq!(body["img"], "https://img.example/smith.png");

    let (status, body) = app.send(Method::GET, "/v1/dentists", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn garbled_token_is_ignored_on_public_route() {
    let app = app().await;
    let (status, _) = app
        .send(Method::GET, "/v1/dentists/42", Some("Bearer not.a.jwt"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn garbled_token_on_protected_route_is_unauthorized() {
    let app = app().await;
    let (status, body) = app
        .send(Method::PUT, "/v1/dentists/42", Some("Bearer garbage"), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn missing_token_on_protected_route_is_unauthorized() {
    let app = app().await;
    let (status, _) = app.send(Method::GET, "/v1/rbac/roles", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_signed_with_another_secret_is_unauthorized() {
    let app = app().await;
    let forged = issue_token("admin", "u1", b"not-the-secret", Duration::from_secs(60)).unwrap();
    let (status, _) = app
        .send(Method::GET, "/v1/rbac/users", Some(&bearer(&forged)), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_token_without_matching_rule_is_denied() {
    let app = app().await;
    // Secretaries may read roles but not list users.
    let (access, _) = app.login("front").await;
    let (status, _) = app
        .send(Method::GET, "/v1/rbac/roles", Some(&bearer(&access)), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(Method::GET, "/v1/rbac/users", Some(&bearer(&access)), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn token_with_unknown_role_carries_no_identity() {
    let app = app().await;
    let token = issue_token("janitor", "u1", SECRET.as_bytes(), Duration::from_secs(60)).unwrap();
    let (status, _) = app
        .send(Method::GET, "/v1/rbac/roles", Some(&bearer(&token)), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn current_user_returns_caller_profile() {
    let app = app().await;
    let (access, _) = app.login("drsmith").await;
    let (status, body) = app
        .send(Method::GET, "/v1/rbac/user", Some(&bearer(&access)), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "drsmith");
    assert_eq!(body["role"], "dentist");
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn admin_manages_users() {
    let app = app().await;
    let (access, _) = app.login("admin").await;
    let auth = bearer(&access);

    let (status, body) = app
        .send(
            Method::POST,
            "/v1/rbac/user",
            Some(&auth),
            Some(json!({
                "role": "secretary",
                "firstname": "Ann",
                "lastname": "Lee",
                "username": "alee",
                "password": "pw"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let guid = body["guid"].as_str().unwrap().to_string();

    let (status, _) = app
        .send(
            Method::POST,
            "/v1/rbac/user",
            Some(&auth),
            Some(json!({ "role": "secretary", "username": "alee", "password": "pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .send(Method::GET, "/v1/rbac/users?role=secretary", Some(&auth), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    let uri = format!("/v1/rbac/user/{guid}");
    let (status, _) = app.send(Method::DELETE, &uri, Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.send(Method::DELETE, &uri, Some(&auth), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_is_public() {
    let app = app().await;
    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn lowercase_bearer_scheme_is_recognised() {
    let app = app().await;
    let (access, _) = app.login("admin").await;
    let (status, _) = app
        .send(
            Method::GET,
            "/v1/rbac/users",
            Some(&format!("bearer {access}")),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unrouted_method_is_not_gated() {
    let app = app().await;
    let (status, _) = app.send(Method::DELETE, "/v1/dentists/42", None, None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (access, _) = app.login("site").await;
    let (status, _) = app
        .send(Method::DELETE, "/v1/dentists/42", Some(&bearer(&access)), None)
        .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = app.send(Method::PATCH, "/v1/rbac/roles", None, None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
