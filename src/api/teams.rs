use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use std::sync::Arc;

use super::common::{message, parse_id, JsonBody};
use crate::core::models::{Team, TeamInput};
use crate::error::AppResult;
use crate::proxy::middleware::AdminPrincipal;
use crate::state::AppState;

const TABLE: &str = "teams";

pub async fn list_teams(
    State(state): State<Arc<AppState>>,
    AdminPrincipal(_admin): AdminPrincipal,
) -> AppResult<Json<Vec<Team>>> {
    let teams = state
        .supabase
        .select(TABLE, &[("select", "*".to_string()), ("order", "name.asc".to_string())])
        .await?;
    Ok(Json(teams))
}

pub async fn create_team(
    State(state): State<Arc<AppState>>,
    AdminPrincipal(admin): AdminPrincipal,
    JsonBody(input): JsonBody<TeamInput>,
) -> AppResult<Json<Team>> {
    let team = input.validate()?;
    let created: Team = state.supabase.insert(TABLE, &team).await?;
    tracing::info!(admin = %admin.id, team = %created.id, "Team created");
    Ok(Json(created))
}

pub async fn update_team(
    State(state): State<Arc<AppState>>,
    AdminPrincipal(admin): AdminPrincipal,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<TeamInput>,
) -> AppResult<Json<Team>> {
    let id = parse_id(&id, "team")?;
    let team = input.validate()?;
    let updated: Team = state.supabase.update(TABLE, id, &team).await?;
    tracing::info!(admin = %admin.id, team = %id, "Team updated");
    Ok(Json(updated))
}

pub async fn delete_team(
    State(state): State<Arc<AppState>>,
    AdminPrincipal(admin): AdminPrincipal,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, "team")?;
    state.supabase.delete(TABLE, id).await?;
    tracing::info!(admin = %admin.id, team = %id, "Team deleted");
    Ok(message("Team deleted."))
}
