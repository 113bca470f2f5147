/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - An in-memory SQLite database with migrations applied
/// - A fully built router
/// - Request helpers driving the router with `tower::ServiceExt`
/// - Register/login helpers that return a usable bearer token

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use taskbox::app::{build_router, AppState};
use taskbox::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use tower::ServiceExt as _;
use tower_http::normalize_path::NormalizePath;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: SqlitePool,
    pub app: NormalizePath<axum::Router>,
    pub config: Config,
}

impl TestContext {
    /// Creates a new test context over a fresh in-memory database
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            },
        };

        // A single connection keeps every query on the same in-memory database
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&config.database.url)
            .await?;

        sqlx::migrate!("./migrations").run(&db).await?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext { db, app, config })
    }

    /// Sends a request and returns the status plus parsed JSON body
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    /// Registers a user and returns the login token
    pub async fn register_and_login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/auth/register",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "registration failed: {}", body);

        let (status, body) = self
            .request(
                "POST",
                "/auth/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);

        body["access_token"]
            .as_str()
            .expect("login response should carry access_token")
            .to_string()
    }
}
