//! Shared helpers for the API integration tests.
//!
//! Every test drives the full production router (same middleware stack as
//! `main.rs`) against a fresh [`MemoryStore`].

#![allow(dead_code)]

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{DateTime, Utc};
use ghost_api::auth::jwt::{generate_access_token, JwtConfig};
use ghost_api::auth::password::hash_password;
use ghost_api::config::ServerConfig;
use ghost_api::router::build_app_router;
use ghost_api::state::AppState;
use ghost_core::admin::AdminRole;
use ghost_core::permissions::Permissions;
use ghost_core::suggestion::{NewSuggestion, Suggestion};
use ghost_core::taxonomy::Taxonomy;
use ghost_db::models::admin::{AdminAccount, NewAdmin};
use ghost_db::{AdminStore, MemoryStore, Store, SuggestionStore};
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Password shared by every seeded admin.
pub const TEST_PASSWORD: &str = "Test-Passw0rd!";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough-for-hs256".to_string(),
            expiry_hours: 24,
        },
        database_url: None,
        default_page_size: 20,
        export_include_reply: false,
        taxonomy_path: None,
        bootstrap_admin: None,
    }
}

/// A fresh in-memory store plus the router built on top of it.
pub fn build_test_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let app = build_app_with_store(store.clone());
    (app, store)
}

/// Build the full router over any store implementation.
pub fn build_app_with_store(store: Arc<dyn Store>) -> Router {
    let config = test_config();
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
        taxonomy: Arc::new(Taxonomy::default()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

/// Argon2 is slow in debug builds; hash the shared password once per binary.
fn test_password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(TEST_PASSWORD).expect("hashing should succeed"))
        .clone()
}

/// Insert an active admin whose password is [`TEST_PASSWORD`].
pub async fn seed_admin(
    store: &MemoryStore,
    email: &str,
    first_name: &str,
    permissions: Permissions,
) -> AdminAccount {
    store
        .insert_admin(&NewAdmin {
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: "Tester".to_string(),
            role: AdminRole::Hr,
            permissions,
            password_hash: test_password_hash(),
        })
        .await
        .expect("admin insert should succeed")
}

/// A bearer token for `admin`, minted with the test JWT secret.
pub fn token_for(admin: &AdminAccount) -> String {
    generate_access_token(admin.id, admin.role.as_str(), &test_config().jwt)
        .expect("token generation should succeed")
}

/// Seed an admin and return it with a ready-to-use token.
pub async fn admin_with_token(
    store: &MemoryStore,
    email: &str,
    permissions: Permissions,
) -> (AdminAccount, String) {
    let admin = seed_admin(store, email, "Test", permissions).await;
    let token = token_for(&admin);
    (admin, token)
}

/// Insert a submission through the store (not the HTTP surface).
pub async fn seed_suggestion(
    store: &MemoryStore,
    category: &str,
    subcategory: &str,
    text: &str,
) -> Suggestion {
    let new = NewSuggestion::validate(&Taxonomy::default(), category, subcategory, text)
        .expect("seed submission should be valid");
    store
        .insert_suggestion(&new)
        .await
        .expect("suggestion insert should succeed")
}

/// Insert a suggestion with a fixed creation time.
pub async fn seed_suggestion_at(
    store: &MemoryStore,
    category: &str,
    subcategory: &str,
    text: &str,
    created_at: DateTime<Utc>,
) -> Suggestion {
    let new = NewSuggestion::validate(&Taxonomy::default(), category, subcategory, text)
        .expect("seed submission should be valid");
    store.seed_suggestion(new.into_suggestion(0, created_at)).await
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, None, body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::POST, uri, Some(token), body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, Some(token), body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Bodies
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}
