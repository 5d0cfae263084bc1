// SpotGo 响应转换 - upstream answer -> local response
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use std::fmt;

use crate::error::{AppError, AppResult};
use crate::proxy::upstream::UpstreamResponse;

pub const OWNER_FIELD: &str = "owner";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Freight,
    Vehicle,
}

impl ResourceKind {
    /// Upstream collection path segment
    pub fn collection(self) -> &'static str {
        match self {
            ResourceKind::Freight => "freights",
            ResourceKind::Vehicle => "vehicles",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Freight => "Freight",
            ResourceKind::Vehicle => "Vehicle",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label().to_lowercase())
    }
}

/// Parses an inbound submit body; only JSON objects can carry an owner.
pub fn parse_object(body: &[u8]) -> AppResult<Map<String, Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::BadRequest("Missing request body".to_string()));
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::BadRequest(
            "Request body must be a JSON object".to_string(),
        )),
        Err(e) => Err(AppError::BadRequest(format!(
            "Request body is not valid JSON: {}",
            e
        ))),
    }
}

/// Overwrites `owner` with the server-held identity, whatever the caller sent.
pub fn with_owner(mut payload: Map<String, Value>, owner: &str) -> Map<String, Value> {
    payload.insert(OWNER_FIELD.to_string(), Value::String(owner.to_string()));
    payload
}

/// JSON if the text parses, otherwise `{ "raw": text }`
pub fn parse_or_wrap(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| json!({ "raw": text }))
}

fn upstream_failure(kind: ResourceKind, operation: &str, response: UpstreamResponse) -> AppError {
    tracing::warn!(
        "SpotGo {} {} failed: {} {}",
        kind,
        operation,
        response.status,
        response.text()
    );
    AppError::Upstream(response)
}

pub fn translate_submit(kind: ResourceKind, response: UpstreamResponse) -> AppResult<Response> {
    if !response.status.is_success() {
        return Err(upstream_failure(kind, "submit", response));
    }
    Ok((StatusCode::OK, Json(parse_or_wrap(&response.text()))).into_response())
}

pub fn translate_delete(kind: ResourceKind, response: UpstreamResponse) -> AppResult<Response> {
    if !response.status.is_success() {
        return Err(upstream_failure(kind, "delete", response));
    }
    Ok((
        StatusCode::OK,
        Json(json!({ "message": format!("{} deleted.", kind.label()) })),
    )
        .into_response())
}

/// Pass-through: status, content type and body exactly as received
pub fn forward_raw(response: UpstreamResponse) -> Response {
    response.into_response()
}
