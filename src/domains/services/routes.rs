//! Admin HTTP routes over service definitions.
//!
//! - `GET    /services`              list definitions
//! - `POST   /services`              create a definition
//! - `POST   /services/refresh`      re-register tools for active definitions
//! - `GET    /services/{name}`       fetch one definition
//! - `PUT    /services/{name}`       replace a definition
//! - `DELETE /services/{name}`       remove a definition
//! - `POST   /services/{name}/test`  synthesize and invoke once

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rmcp::model::JsonObject;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::{error, info};

use super::admin::{AdminService, RefreshFailure};
use super::error::ServiceError;
use super::model::ServiceDefinition;

/// Error returned by admin handlers.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (kind, message) = match self {
            ApiError::BadRequest(msg) => ("bad_request", msg),
            ApiError::NotFound(msg) => ("not_found", msg),
            ApiError::Internal(msg) => ("internal_error", msg),
        };

        (status, Json(ErrorBody { error: kind, message })).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidDefinition(_) | ServiceError::DuplicateName(_) => {
                ApiError::BadRequest(err.to_string())
            }
            ServiceError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ServiceError::ConfigRead { .. }
            | ServiceError::ConfigWrite { .. }
            | ServiceError::Synthesis { .. } => {
                error!("Admin request failed: {}", err);
                ApiError::Internal(err.to_string())
            }
        }
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Decode a JSON request body, reporting failures as [`ApiError::BadRequest`].
fn parse_body<T: DeserializeOwned>(body: &[u8], what: &str) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("Invalid {}: {}", what, e)))
}

/// Build the admin router.
pub fn admin_router(admin: Arc<AdminService>) -> Router {
    Router::new()
        .route("/services", get(list_services).post(create_service))
        .route("/services/refresh", post(refresh_services))
        .route(
            "/services/{name}",
            get(get_service).put(update_service).delete(delete_service),
        )
        .route("/services/{name}/test", post(test_service))
        .with_state(admin)
}

async fn list_services(State(admin): State<Arc<AdminService>>) -> ApiResult<Json<Vec<ServiceDefinition>>> {
    Ok(Json(admin.list().await?))
}

async fn get_service(
    State(admin): State<Arc<AdminService>>,
    Path(name): Path<String>,
) -> ApiResult<Json<ServiceDefinition>> {
    Ok(Json(admin.get(&name).await?))
}

async fn create_service(
    State(admin): State<Arc<AdminService>>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<ServiceDefinition>)> {
    let service = parse_body(&body, "service definition")?;
    let created = admin.create(service).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_service(
    State(admin): State<Arc<AdminService>>,
    Path(name): Path<String>,
    body: Bytes,
) -> ApiResult<Json<ServiceDefinition>> {
    let service = parse_body(&body, "service definition")?;
    Ok(Json(admin.update(&name, service).await?))
}

async fn delete_service(
    State(admin): State<Arc<AdminService>>,
    Path(name): Path<String>,
) -> ApiResult<Json<Value>> {
    admin.delete(&name).await?;
    Ok(Json(json!({ "message": "Service deleted" })))
}

#[derive(Serialize)]
struct RefreshResponse {
    message: String,
    registered: Vec<String>,
    failed: Vec<RefreshFailure>,
}

async fn refresh_services(State(admin): State<Arc<AdminService>>) -> ApiResult<Json<RefreshResponse>> {
    let report = admin.refresh().await?;
    info!(
        "Refresh complete: {} registered, {} failed",
        report.registered.len(),
        report.failed.len()
    );

    let message = if report.failed.is_empty() {
        "All services refreshed successfully".to_string()
    } else {
        format!("{} services failed to refresh", report.failed.len())
    };

    Ok(Json(RefreshResponse {
        message,
        registered: report.registered,
        failed: report.failed,
    }))
}

async fn test_service(
    State(admin): State<Arc<AdminService>>,
    Path(name): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let params: JsonObject = if body.iter().all(u8::is_ascii_whitespace) {
        JsonObject::new()
    } else {
        parse_body(&body, "test parameters")?
    };
    Ok(Json(admin.test(&name, &params).await?))
}
