// SpotGo 端点处理器
//
// Submit/delete use the server-held API key for every caller and stamp the
// server-held owner on submitted resources. The direct vehicle route instead
// forwards the caller's own marketplace credentials.
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method},
    response::Response,
    Extension,
};
use bytes::Bytes;
use serde_json::Value;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::proxy::mappers::spotgo::{
    forward_raw, parse_object, translate_delete, translate_submit, with_owner, ResourceKind,
};
use crate::proxy::middleware::auth::{AuthError, Claims};
use crate::proxy::upstream::client::{API_VERSION, API_VERSION_HEADER};
use crate::proxy::upstream::UpstreamClient;
use crate::state::AppState;

pub const AUTHORIZATION_EMAIL_HEADER: &str = "authorization-email";

pub async fn submit_freight(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    body: Bytes,
) -> AppResult<Response> {
    submit(&state, &claims, ResourceKind::Freight, body).await
}

pub async fn delete_freight(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    delete(&state, &claims, ResourceKind::Freight, &id).await
}

pub async fn submit_vehicle(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    body: Bytes,
) -> AppResult<Response> {
    submit(&state, &claims, ResourceKind::Vehicle, body).await
}

pub async fn delete_vehicle(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    delete(&state, &claims, ResourceKind::Vehicle, &id).await
}

async fn submit(
    state: &AppState,
    claims: &Claims,
    kind: ResourceKind,
    body: Bytes,
) -> AppResult<Response> {
    let api_key = state.spotgo_api_key()?;
    let owner = state.spotgo_owner()?;

    let payload = with_owner(parse_object(&body)?, owner);
    let payload = Bytes::from(serde_json::to_vec(&Value::Object(payload))?);

    tracing::info!(user = %claims.sub, "Submitting {} to SpotGo", kind);
    let response = state
        .upstream
        .send(
            Method::POST,
            &[kind.collection()],
            UpstreamClient::api_key_headers(api_key)?,
            Some(payload),
        )
        .await?;
    translate_submit(kind, response)
}

async fn delete(
    state: &AppState,
    claims: &Claims,
    kind: ResourceKind,
    id: &str,
) -> AppResult<Response> {
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::BadRequest(format!("Missing {} id", kind)));
    }
    let api_key = state.spotgo_api_key()?;

    let mut headers = UpstreamClient::api_key_headers(api_key)?;
    headers.remove(header::CONTENT_TYPE);

    tracing::info!(user = %claims.sub, "Deleting {} {} on SpotGo", kind, id);
    let response = state
        .upstream
        .send(Method::DELETE, &[kind.collection(), id], headers, None)
        .await?;
    translate_delete(kind, response)
}

/// Delete and pass-through paths that end before the id segment
pub async fn missing_id() -> AppError {
    AppError::BadRequest("Missing resource id".to_string())
}

/// `GET|PUT|DELETE` on one vehicle with the caller's own credentials
pub async fn vehicle_passthrough(
    State(state): State<Arc<AppState>>,
    method: Method,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Response> {
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::BadRequest("Missing vehicle id".to_string()));
    }
    let authorization = headers
        .get(header::AUTHORIZATION)
        .cloned()
        .ok_or(AuthError::MissingToken)?;

    let mut forward = HeaderMap::new();
    forward.insert(header::AUTHORIZATION, authorization);
    if let Some(email) = headers.get(AUTHORIZATION_EMAIL_HEADER) {
        forward.insert(HeaderName::from_static(AUTHORIZATION_EMAIL_HEADER), email.clone());
    }
    forward.insert(
        HeaderName::from_static(API_VERSION_HEADER),
        HeaderValue::from_static(API_VERSION),
    );
    forward.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    let body = (!body.is_empty()).then_some(body);
    let response = state
        .upstream
        .send(method.clone(), &["vehicles", id], forward, body)
        .await?;
    if !response.status.is_success() {
        tracing::warn!(
            "SpotGo vehicle {} {} failed: {} {}",
            method,
            id,
            response.status,
            response.text()
        );
    }
    Ok(forward_raw(response))
}
