use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// `{ "message": ... }` with 200
pub fn message(text: impl Into<String>) -> Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "message": text.into() })),
    )
        .into_response()
}

/// Path ids are UUIDs in the database; anything else is a client error.
pub fn parse_id(raw: &str, what: &str) -> AppResult<Uuid> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::BadRequest(format!("Missing {} id", what)));
    }
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid {} id: {}", what, raw)))
}

/// `Json` request body whose rejections are `AppError::BadRequest`
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

#[derive(Deserialize)]
pub struct PageParams {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

pub async fn request_logger(
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = std::time::Instant::now();
    let response = next.run(req).await;
    let duration = start.elapsed();
    tracing::info!(
        "{} {} - status: {}, latency: {}ms",
        method,
        uri.path(),
        response.status(),
        duration.as_millis()
    );
    response
}
