/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
/// Services are constructed once at startup and threaded through the
/// router explicitly; nothing lives in ambient global state.
///
/// # Example
///
/// ```no_run
/// use taskbox::{app::AppState, config::Config, db};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = db::create_pool(&config.database).await?;
/// let state = AppState::new(pool, config);
/// let app = taskbox::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{auth::middleware::require_auth, routes};
use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::Layer as _;
use tower_http::{
    cors::CorsLayer,
    normalize_path::{NormalizePath, NormalizePathLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::Config;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: SqlitePool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the token signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                   # Health check (public)
/// ├── /auth/                    # Authentication (public)
/// │   ├── POST /register
/// │   └── POST /login
/// └── /tasks/                   # Task CRUD (bearer token required)
///     ├── POST   /
///     ├── GET    /
///     ├── PUT    /:id
///     ├── DELETE /:id
///     └── PATCH  /:id/done
/// ```
///
/// The bearer-token layer wraps only the `/tasks` subtree, so every task
/// route rejects unauthenticated requests uniformly before its handler
/// (or any storage access) runs.
///
/// The router is wrapped in `NormalizePathLayer` so `/tasks/` and `/tasks`
/// resolve to the same routes. Routing runs before router-level layers,
/// so the normalization must wrap the router from the outside; callers
/// serve it via `axum::ServiceExt::into_make_service` (see `main.rs`).
pub fn build_router(state: AppState) -> NormalizePath<Router> {
    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Task routes (require a valid bearer token)
    let task_routes = Router::new()
        .route("/", post(routes::tasks::add_task))
        .route("/", get(routes::tasks::list_tasks))
        .route("/:id", put(routes::tasks::update_task))
        .route("/:id", delete(routes::tasks::delete_task))
        .route("/:id/done", patch(routes::tasks::mark_task_done))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let router = Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .nest("/tasks", task_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state);

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
