//! Schools Service - HTTP microservice for school proximity queries.
//!
//! Registers schools with their coordinates and lists them nearest-first
//! from any location.
//!
//! ## Environment Variables
//!
//! Variables may also be set in a `.env` file in the working directory.
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `SCHOOLS_DATABASE_URL` | SQLite connection URL | `sqlite://schools.db` |
//! | `SCHOOLS_MAX_CONNECTIONS` | Maximum pooled connections | 5 |
//! | `SCHOOLS_PORT` | HTTP server port | 3000 |
//! | `RUST_LOG` | Log level (e.g., "info", "debug") | "info" |
//!
//! ## Endpoints
//!
//! - `POST /api/addSchool` - Register a school
//! - `GET /api/listSchools?latitude=X&longitude=Y` - Schools ordered by distance
//! - `GET /api/school/:id` - Single school
//! - `GET /health` - Health check
//! - `GET /docs` - OpenAPI documentation (Swagger UI)

use std::net::SocketAddr;
use std::sync::Arc;

use schools::{Database, DatabaseConfig, SchoolRepository};
use schools_service::{router, AppState};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PORT: u16 = 3000;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "schools_service=info,schools=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port: u16 = std::env::var("SCHOOLS_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let config = DatabaseConfig::from_env()?;

    tracing::info!(
        database_url = %config.url,
        max_connections = config.max_connections,
        port = port,
        "Starting schools service"
    );

    let database = match Database::connect(&config).await {
        Ok(database) => database,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start server");
            return Err(e.into());
        }
    };

    let state = Arc::new(AppState {
        repository: SchoolRepository::new(database.clone()),
    });
    let app = router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("API docs: http://{}/docs", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down gracefully");
    database.close().await;

    Ok(())
}

/// Resolve when the process receives Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
