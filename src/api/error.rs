//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::db::DatabaseError;
use crate::validate::FieldError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Database not configured: {0}")]
    Configuration(String),
    #[error("Database unavailable: {0}")]
    Connectivity(String),
    #[error("Validation failed")]
    Validation(Vec<FieldError>),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, fields) = match self {
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid username or password".to_string(),
                Vec::new(),
            ),
            ApiError::Configuration(detail) => {
                tracing::error!(detail, "database not configured");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "DB_NOT_CONFIGURED",
                    "Database is not configured".to_string(),
                    Vec::new(),
                )
            }
            ApiError::Connectivity(detail) => {
                tracing::error!(detail, "database unreachable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "DB_UNAVAILABLE",
                    "Database is unavailable".to_string(),
                    Vec::new(),
                )
            }
            ApiError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_FAILED",
                "Please correct the form errors".to_string(),
                fields,
            ),
            ApiError::NotFound(detail) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", detail, Vec::new())
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                    Vec::new(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code,
                message,
                fields,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        if err.is_connectivity() {
            ApiError::Connectivity(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(err: rusqlite::Error) -> Self {
        ApiError::from(DatabaseError::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn rejected_login_returns_401() {
        let response = ApiError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn not_found_returns_404() {
        let response = ApiError::NotFound("Patient not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "Patient not found");
    }

    #[tokio::test]
    async fn validation_lists_field_messages() {
        let response = ApiError::Validation(vec![FieldError {
            field: "phone",
            message: "bad phone".into(),
        }])
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_FAILED");
        assert_eq!(json["error"]["fields"][0]["field"], "phone");
    }

    #[tokio::test]
    async fn internal_hides_details_from_client() {
        let response = ApiError::Internal("something broke".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn missing_configuration_maps_to_503() {
        let response = ApiError::Configuration("CONSULTORIO_DB unset".into()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "DB_NOT_CONFIGURED");
    }

    #[tokio::test]
    async fn connectivity_database_error_maps_to_503() {
        let err = rusqlite::Connection::open("/nonexistent-dir/clinic.db").unwrap_err();
        let api: ApiError = err.into();
        let response = api.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
