use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::proxy::middleware::auth::AuthError;
use crate::proxy::upstream::UpstreamResponse;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Method {method} Not Allowed")]
    MethodNotAllowed {
        method: Method,
        allowed: &'static [Method],
    },

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upstream responded with {}", .0.status)]
    Upstream(UpstreamResponse),

    #[error("Upstream request timed out")]
    UpstreamTimeout,

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Auth(e) => e.status(),
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Upstream(response) => response.status,
            AppError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_) | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Joins an allow-list into the `Allow` header form, e.g. `GET, PUT`.
pub fn allow_header_value(allowed: &[Method]) -> String {
    allowed
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            AppError::MethodNotAllowed { method, allowed } => {
                let mut response =
                    (status, format!("Method {} Not Allowed", method)).into_response();
                if let Ok(value) = HeaderValue::from_str(&allow_header_value(allowed)) {
                    response.headers_mut().insert(header::ALLOW, value);
                }
                response
            }
            // Upstream failures are forwarded byte-for-byte.
            AppError::Upstream(response) => response.into_response(),
            AppError::BadRequest(message)
            | AppError::NotFound(message)
            | AppError::Conflict(message) => {
                (status, Json(json!({ "error": message }))).into_response()
            }
            AppError::Auth(e) => {
                let message = if status == StatusCode::FORBIDDEN {
                    "Forbidden"
                } else {
                    "Unauthorized"
                };
                tracing::debug!("Auth rejected: {}", e);
                (status, Json(json!({ "error": message }))).into_response()
            }
            AppError::Config(detail) => {
                tracing::error!("Configuration error: {}", detail);
                (status, Json(json!({ "error": "Server configuration error" }))).into_response()
            }
            AppError::UpstreamTimeout => {
                (status, Json(json!({ "error": "Upstream request timed out" }))).into_response()
            }
            AppError::UpstreamUnavailable(detail) => {
                tracing::error!("Upstream unavailable: {}", detail);
                (status, Json(json!({ "error": "Upstream service unavailable" }))).into_response()
            }
            AppError::Database(detail) => {
                tracing::error!("Database request failed: {}", detail);
                (status, Json(json!({ "error": "Database request failed" }))).into_response()
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (status, Json(json!({ "error": "Internal server error" }))).into_response()
            }
        }
    }
}

/// Body rejections become 400s; the serde detail stays in the logs.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected JSON body: {}", rejection.body_text());
        let message = match rejection {
            JsonRejection::MissingJsonContentType(_) => "Expected a JSON request body",
            JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON",
            JsonRejection::JsonDataError(_) => "Request body has missing or mistyped fields",
            _ => "Invalid request body",
        };
        AppError::BadRequest(message.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {}", e))
    }
}
