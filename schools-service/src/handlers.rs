//! HTTP request handlers for the schools service.

use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use schools::{
    validation, Coordinates, FieldError, NewSchool, RankedSchool, School, SchoolError,
    ValidationErrors,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::AppState;

/// Endpoints advertised by the fallback handler.
pub const AVAILABLE_ENDPOINTS: [&str; 4] = [
    "GET /health",
    "POST /api/addSchool",
    "GET /api/listSchools",
    "GET /api/school/:id",
];

/// Query parameters for the list endpoint.
///
/// Values are kept as raw text and parsed by the validator, so a malformed
/// number is reported per field instead of rejecting the whole query.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListSchoolsQuery {
    /// Reference latitude in decimal degrees (-90 to 90).
    pub latitude: Option<String>,
    /// Reference longitude in decimal degrees (-180 to 180).
    pub longitude: Option<String>,
}

/// Wrapper for a single school.
#[derive(Debug, Serialize, ToSchema)]
pub struct SchoolData {
    pub school: School,
}

/// Successful single-school response.
#[derive(Debug, Serialize, ToSchema)]
pub struct SchoolResponse {
    pub success: bool,
    pub message: String,
    pub data: SchoolData,
}

/// Ranked list payload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchoolListData {
    /// The reference point the list was ranked from.
    pub user_location: Coordinates,
    /// Schools ordered nearest-first.
    pub schools: Vec<RankedSchool>,
    /// Number of schools in the list.
    pub total_count: usize,
}

/// Successful list response.
#[derive(Debug, Serialize, ToSchema)]
pub struct SchoolListResponse {
    pub success: bool,
    pub message: String,
    pub data: SchoolListData,
}

/// Error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Summary of what failed.
    pub message: String,
    /// Generic error detail (storage and internal failures).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Field-level validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    fn message(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            error: None,
            errors: None,
        }
    }

    fn with_error(message: &str, error: &str) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::message(message)
        }
    }

    fn validation(errors: ValidationErrors) -> Self {
        Self {
            errors: Some(errors.into_errors()),
            ..Self::message("Validation error")
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    /// Server time (UTC).
    pub timestamp: DateTime<Utc>,
    /// Service version.
    pub version: String,
}

/// Response for unmatched routes.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundResponse {
    pub success: bool,
    pub message: String,
    pub available_endpoints: Vec<String>,
}

/// Register a new school.
///
/// # Returns
///
/// - `201 Created` with the stored school
/// - `400 Bad Request` with field-level errors if the body is invalid
/// - `500 Internal Server Error` if the school could not be stored
#[utoipa::path(
    post,
    path = "/api/addSchool",
    tag = "schools",
    request_body = NewSchool,
    responses(
        (status = 201, description = "School created", body = SchoolResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn add_school(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected add-school body");
            let errors =
                ValidationErrors::from(vec![FieldError::new("body", rejection.body_text())]);
            return error_response(errors.into(), "Failed to add school");
        }
    };

    let new_school = match validation::validate_new_school(&body) {
        Ok(school) => school,
        Err(errors) => return error_response(errors.into(), "Failed to add school"),
    };

    match state.repository.create(&new_school).await {
        Ok(school) => {
            tracing::info!(id = school.id, name = %school.name, "School added");
            (
                StatusCode::CREATED,
                Json(SchoolResponse {
                    success: true,
                    message: "School added successfully".to_string(),
                    data: SchoolData { school },
                }),
            )
                .into_response()
        }
        Err(e) => error_response(e, "Failed to add school"),
    }
}

/// List all schools ordered by distance from the given point.
///
/// # Returns
///
/// - `200 OK` with the ranked list (possibly empty)
/// - `400 Bad Request` if `latitude`/`longitude` are missing or invalid
/// - `500 Internal Server Error` if schools could not be read
#[utoipa::path(
    get,
    path = "/api/listSchools",
    tag = "schools",
    params(ListSchoolsQuery),
    responses(
        (status = 200, description = "Schools ranked nearest-first", body = SchoolListResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_schools(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListSchoolsQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected list-schools query");
            return error_response(
                query_rejection_errors(&rejection).into(),
                "Failed to retrieve schools",
            );
        }
    };

    let location = match validation::validate_coordinates(
        query.latitude.as_deref(),
        query.longitude.as_deref(),
    ) {
        Ok(location) => location,
        Err(errors) => return error_response(errors.into(), "Failed to retrieve schools"),
    };

    tracing::debug!(
        lat = location.latitude,
        lon = location.longitude,
        "Proximity query"
    );

    match state
        .repository
        .find_by_proximity(location.latitude, location.longitude)
        .await
    {
        Ok(schools) => {
            tracing::info!(
                lat = location.latitude,
                lon = location.longitude,
                count = schools.len(),
                "Schools ranked"
            );
            let total_count = schools.len();
            (
                StatusCode::OK,
                Json(SchoolListResponse {
                    success: true,
                    message: "Schools retrieved successfully".to_string(),
                    data: SchoolListData {
                        user_location: location,
                        schools,
                        total_count,
                    },
                }),
            )
                .into_response()
        }
        Err(e) => error_response(e, "Failed to retrieve schools"),
    }
}

/// Get a single school by id.
///
/// # Returns
///
/// - `200 OK` with the school
/// - `400 Bad Request` if the id is not an integer
/// - `404 Not Found` if no school has that id
/// - `500 Internal Server Error` if the school could not be read
#[utoipa::path(
    get,
    path = "/api/school/{id}",
    tag = "schools",
    params(("id" = i64, Path, description = "School id")),
    responses(
        (status = 200, description = "School found", body = SchoolResponse),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "School not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn get_school(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Response {
    let id = match validation::validate_school_id(&raw_id) {
        Ok(id) => id,
        Err(errors) => return error_response(errors.into(), "Failed to retrieve school"),
    };

    match state.repository.find_by_id(id).await {
        Ok(Some(school)) => (
            StatusCode::OK,
            Json(SchoolResponse {
                success: true,
                message: "School retrieved successfully".to_string(),
                data: SchoolData { school },
            }),
        )
            .into_response(),
        Ok(None) => error_response(SchoolError::NotFound { id }, "Failed to retrieve school"),
        Err(e) => error_response(e, "Failed to retrieve school"),
    }
}

/// Field errors for a query string that could not be deserialized at all,
/// e.g. a repeated `latitude` parameter.
fn query_rejection_errors(rejection: &QueryRejection) -> ValidationErrors {
    let detail = rejection.body_text();
    let mut errors = ValidationErrors::new();
    for (field, label) in [("latitude", "Latitude"), ("longitude", "Longitude")] {
        if detail.contains(&format!("`{}`", field)) {
            errors.push(field, format!("{} must be a number", label));
        }
    }
    if errors.is_empty() {
        errors.push("query", detail);
    }
    errors
}

/// Map a library error onto a status code and JSON body.
///
/// Storage details are logged but never sent to the client.
fn error_response(e: SchoolError, failure: &str) -> Response {
    match e {
        SchoolError::Validation(errors) => {
            tracing::debug!(errors = %errors, "Validation failed");
            (StatusCode::BAD_REQUEST, Json(ErrorResponse::validation(errors))).into_response()
        }
        SchoolError::NotFound { id } => {
            tracing::debug!(id = id, "School not found");
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::message("School not found")),
            )
                .into_response()
        }
        other => {
            tracing::error!(error = %other, "{}", failure);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_error(failure, "Database operation failed")),
            )
                .into_response()
        }
    }
}

/// Health check endpoint.
///
/// Returns service status, server time and version.
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses((status = 200, description = "Service is running", body = HealthResponse))
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "School Management API is running".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Fallback for unmatched routes.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            success: false,
            message: "Endpoint not found".to_string(),
            available_endpoints: AVAILABLE_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
        }),
    )
}

/// Turn a handler panic into the generic 500 body.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic"
    };

    tracing::error!(panic = detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::with_error(
            "Internal server error",
            "Something went wrong",
        )),
    )
        .into_response()
}
