#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use totalgrind_api::auth::jwt::{generate_access_token, JwtConfig};
use totalgrind_api::config::ServerConfig;
use totalgrind_api::router::build_app_router;
use totalgrind_api::state::AppState;
use totalgrind_core::roles::Role;
use totalgrind_db::models::user::{CreateUser, User};
use totalgrind_db::Repositories;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// The full application router over a fresh in-memory store, plus direct
/// access to that store for seeding and assertions.
pub struct TestApp {
    pub router: Router,
    pub repos: Repositories,
    pub config: ServerConfig,
}

/// Build the production router (same middleware stack as `main.rs`) backed by
/// in-memory repositories.
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let repos = Repositories::in_memory();
    let state = AppState {
        repos: repos.clone(),
        config: Arc::new(config.clone()),
    };
    TestApp {
        router: build_app_router(state, &config),
        repos,
        config,
    }
}

impl TestApp {
    /// Insert a user directly into the store.
    pub async fn seed_user(&self, name: &str, role: Role) -> User {
        self.repos
            .users
            .create(&CreateUser {
                email: format!("{}@example.com", name.to_lowercase()),
                name: name.to_string(),
                role,
            })
            .await
            .expect("seeding user should succeed")
    }

    /// A valid Bearer token for `user`, as the identity issuer would mint it.
    pub fn token_for(&self, user: &User) -> String {
        generate_access_token(user.id, user.role.as_str(), &self.config.jwt)
            .expect("token generation should succeed")
    }

    /// Send a request, optionally authenticated and with a JSON body.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, token: &str) -> Response<Body> {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> Response<Body> {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> Response<Body> {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> Response<Body> {
        self.send(Method::DELETE, uri, Some(token), None).await
    }
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
