//! # Taskbox API Server
//!
//! Process bootstrap: initialize tracing, load configuration, open the
//! database pool, run migrations, and serve the router.
//!
//! ## Usage
//!
//! ```bash
//! cargo run
//! ```

use axum::{extract::Request, ServiceExt};
use taskbox::{
    app::{build_router, AppState},
    config::Config,
    db,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskbox=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Taskbox API Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database).await?;
    db::run_migrations(&pool).await?;

    let bind_address = config.bind_address();
    let state = AppState::new(pool, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    // The path-normalization layer wraps the router itself, so the app is
    // served as a plain service rather than a Router
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;

    Ok(())
}
