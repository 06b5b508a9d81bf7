//! Schools Service Library
//!
//! HTTP handlers, routing and OpenAPI docs for the schools service.
//! This library is used by both the schools-service binary and integration tests.

pub mod handlers;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use schools::SchoolRepository;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Maximum accepted request body size (10 MB).
pub const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Application state shared across handlers.
pub struct AppState {
    /// Repository over the schools database.
    pub repository: SchoolRepository,
}

/// OpenAPI documentation for the schools service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "School Management API",
        version = "0.1.0",
        description = "Register schools and list them by great-circle distance from a location.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        handlers::add_school,
        handlers::list_schools,
        handlers::get_school,
        handlers::health_check,
    ),
    components(
        schemas(
            schools::School,
            schools::NewSchool,
            schools::RankedSchool,
            schools::Coordinates,
            schools::FieldError,
            handlers::SchoolData,
            handlers::SchoolResponse,
            handlers::SchoolListData,
            handlers::SchoolListResponse,
            handlers::ErrorResponse,
            handlers::HealthResponse,
            handlers::NotFoundResponse,
        )
    ),
    tags(
        (name = "schools", description = "School registration and proximity listing"),
        (name = "system", description = "System and health endpoints")
    )
)]
pub struct ApiDoc;

/// Build the application router with all routes and middleware.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(handlers::health_check))
        .route("/api/addSchool", post(handlers::add_school))
        .route("/api/listSchools", get(handlers::list_schools))
        .route("/api/school/:id", get(handlers::get_school))
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(CatchPanicLayer::custom(handlers::handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

// Re-export commonly used types for convenience
pub use handlers::{
    ErrorResponse, HealthResponse, ListSchoolsQuery, NotFoundResponse, SchoolListResponse,
    SchoolResponse,
};

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use schools::{Database, DatabaseConfig};
    use tower::ServiceExt;

    async fn app() -> Router {
        let database = Database::connect(&DatabaseConfig::in_memory()).await.unwrap();
        router(Arc::new(AppState {
            repository: SchoolRepository::new(database),
        }))
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = app()
            .await
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_openapi_json_served() {
        let response = app()
            .await
            .oneshot(
                Request::builder()
                    .uri("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_openapi_lists_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/addSchool"));
        assert!(doc.paths.paths.contains_key("/api/listSchools"));
        assert!(doc.paths.paths.contains_key("/api/school/{id}"));
        assert!(doc.paths.paths.contains_key("/health"));
    }
}
