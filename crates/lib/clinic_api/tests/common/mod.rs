//! Shared fixtures: an in-memory router seeded with users and one dentist.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use clinic_api::config::{ApiConfig, TokenConfig};
use clinic_api::{AppState, policies};
use clinic_core::auth::memory::{MemoryRefreshTokenStore, MemoryUserDirectory};
use clinic_core::auth::users::UserDirectory;
use clinic_core::dentists::MemoryDentistRepository;
use clinic_core::models::auth::{Role, UserInput};
use clinic_core::models::dentists::Dentist;
use clinic_core::rbac::PolicyEnforcer;
use serde_json::Value;
use tower::ServiceExt;

pub const SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "correct-horse";

pub struct TestApp {
    pub router: Router,
    pub refresh_tokens: Arc<MemoryRefreshTokenStore>,
    pub users: Arc<MemoryUserDirectory>,
}

pub fn config() -> ApiConfig {
    ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        pg_connection_url: String::new(),
        policy_file: PathBuf::from("policy.csv"),
        request_timeout: Duration::from_secs(5),
        token: TokenConfig {
            secret: SECRET.into(),
            access_ttl: Duration::from_secs(900),
            refresh_ttl: Duration::from_secs(3600),
        },
    }
}

async fn seed_user(users: &MemoryUserDirectory, role: Role, username: &str) {
    users
        .create(UserInput {
            role,
            firstname: "Test".into(),
            lastname: username.into(),
            username: username.into(),
            password: PASSWORD.into(),
        })
        .await
        .expect("seed user");
}

/// Users `admin`, `drsmith` (dentist), `front` (secretary), `site` (website)
/// all with [`PASSWORD`]; dentist 42.
pub async fn app() -> TestApp {
    let users = Arc::new(MemoryUserDirectory::new());
    seed_user(&users, Role::Admin, "admin").await;
    seed_user(&users, Role::Dentist, "drsmith").await;
    seed_user(&users, Role::Secretary, "front").await;
    seed_user(&users, Role::Website, "site").await;

    let dentists = Arc::new(MemoryDentistRepository::with_dentists([Dentist {
        id: 42,
        clone_name: "smith".into(),
        url: "https://img.example/smith.png".into(),
        priority: 1,
        side: "left".into(),
        name: "Dr. Smith".into(),
        info: "Orthodontics".into(),
    }]));

    let refresh_tokens = Arc::new(MemoryRefreshTokenStore::new());
    let enforcer = PolicyEnforcer::new(policies::all()).expect("policies compile");

    let state = AppState {
        users: users.clone(),
        refresh_tokens: refresh_tokens.clone(),
        dentists,
        enforcer: Arc::new(enforcer),
        config: config(),
    };

    TestApp {
        router: clinic_api::router(state),
        refresh_tokens,
        users,
    }
}

impl TestApp {
    /// Send a request; returns the status and the JSON body (`Null` if empty).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            req = req.header(header::AUTHORIZATION, value);
        }
        let req = match body {
            Some(json) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => req.body(Body::empty()),
        }
        .expect("build request");

        let resp = self.router.clone().oneshot(req).await.expect("request");
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// Log in and return `(access_token, refresh_token)`.
    pub async fn login(&self, username: &str) -> (String, String) {
        let (status, body) = self
            .send(
                Method::POST,
                "/v1/login",
                None,
                Some(serde_json::json!({ "username": username, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        (
            body["access_token"].as_str().expect("access_token").to_string(),
            body["refresh_token"].as_str().expect("refresh_token").to_string(),
        )
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
