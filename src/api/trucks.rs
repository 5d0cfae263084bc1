use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use std::sync::Arc;

use super::common::{message, parse_id, JsonBody};
use crate::core::models::{Truck, TruckInput};
use crate::error::AppResult;
use crate::proxy::middleware::Principal;
use crate::state::AppState;

const TABLE: &str = "trucks";

pub async fn list_trucks(
    State(state): State<Arc<AppState>>,
    Principal(_user): Principal,
) -> AppResult<Json<Vec<Truck>>> {
    let trucks = state
        .supabase
        .select(TABLE, &[("select", "*".to_string()), ("order", "plate.asc".to_string())])
        .await?;
    Ok(Json(trucks))
}

pub async fn create_truck(
    State(state): State<Arc<AppState>>,
    Principal(user): Principal,
    JsonBody(input): JsonBody<TruckInput>,
) -> AppResult<Json<Truck>> {
    let truck = input.validate()?;
    let created: Truck = state.supabase.insert(TABLE, &truck).await?;
    tracing::info!(user = %user.id, plate = %created.plate, "Truck created");
    Ok(Json(created))
}

pub async fn delete_truck(
    State(state): State<Arc<AppState>>,
    Principal(user): Principal,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, "truck")?;
    state.supabase.delete(TABLE, id).await?;
    tracing::info!(user = %user.id, truck = %id, "Truck deleted");
    Ok(message("Truck deleted."))
}
