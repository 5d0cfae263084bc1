use axum::{extract::State, Extension, Json};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::proxy::middleware::auth::{AuthError, Claims};
use crate::proxy::middleware::AdminPrincipal;
use crate::state::AppState;

/// Profile row of the token's subject. Runs behind the local token check.
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Value>> {
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
    let rows: Vec<Value> = state
        .supabase
        .select(
            "users",
            &[("select", "*".to_string()), ("id", format!("eq.{}", user_id))],
        )
        .await?;
    rows.into_iter()
        .next()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("User profile not found".to_string()))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    AdminPrincipal(_admin): AdminPrincipal,
) -> AppResult<Json<Vec<Value>>> {
    let rows = state
        .supabase
        .select("users", &[("select", "*".to_string())])
        .await?;
    Ok(Json(rows))
}
