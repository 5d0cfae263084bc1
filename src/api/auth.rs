use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::common::JsonBody;
use crate::core::models::LoginRequest;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> AppResult<Response> {
    let email = req.email.trim();
    if email.is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let session = state.supabase.sign_in_with_password(email, &req.password).await?;
    tracing::info!("User {} signed in", email);
    Ok(Json(session).into_response())
}
