use crate::proxy::handlers::spotgo;
use crate::proxy::middleware::method_guard::{
    guard, DELETE_ONLY, GET_ONLY, GET_POST, GET_PUT_DELETE, POST_ONLY, PUT_DELETE,
};
use crate::proxy::middleware::protect;
use crate::state::AppState;
use axum::{
    middleware::from_fn_with_state,
    routing::{any, delete, get, post, put},
    Json, Router,
};
use std::sync::Arc;

mod auth;
pub mod common;
mod logs;
mod teams;
mod trucks;
mod users;

pub fn build_routes(state: Arc<AppState>) -> Router {
    let local_token = from_fn_with_state(state.clone(), protect);

    Router::new()
        // Auth
        .route("/api/auth/login", guard(POST_ONLY, post(auth::login)))
        // Users
        .route(
            "/api/users/me",
            guard(GET_ONLY, get(users::get_me).route_layer(local_token.clone())),
        )
        .route("/api/admin/users", guard(GET_ONLY, get(users::list_users)))
        // Teams
        .route(
            "/api/admin/teams",
            guard(GET_POST, get(teams::list_teams).post(teams::create_team)),
        )
        .route(
            "/api/admin/teams/:id",
            guard(PUT_DELETE, put(teams::update_team).delete(teams::delete_team)),
        )
        // Trucks
        .route(
            "/api/trucks",
            guard(GET_POST, get(trucks::list_trucks).post(trucks::create_truck)),
        )
        .route("/api/trucks/:id", guard(DELETE_ONLY, delete(trucks::delete_truck)))
        // SpotGo, server-held key
        .route(
            "/api/spotgo/freights",
            guard(
                POST_ONLY,
                post(spotgo::submit_freight).route_layer(local_token.clone()),
            ),
        )
        .route(
            "/api/spotgo/freights/:id",
            guard(
                DELETE_ONLY,
                delete(spotgo::delete_freight).route_layer(local_token.clone()),
            ),
        )
        .route(
            "/api/spotgo/vehicles",
            guard(
                POST_ONLY,
                post(spotgo::submit_vehicle).route_layer(local_token.clone()),
            ),
        )
        .route(
            "/api/spotgo/freights/",
            guard(
                DELETE_ONLY,
                delete(spotgo::missing_id).route_layer(local_token.clone()),
            ),
        )
        .route(
            "/api/spotgo/vehicles/",
            guard(
                DELETE_ONLY,
                delete(spotgo::missing_id).route_layer(local_token.clone()),
            ),
        )
        .route(
            "/api/spotgo/vehicles/:id",
            guard(
                DELETE_ONLY,
                delete(spotgo::delete_vehicle).route_layer(local_token),
            ),
        )
        // SpotGo, caller's own credentials
        .route(
            "/api/spotgo/direct/vehicles/:id",
            guard(GET_PUT_DELETE, any(spotgo::vehicle_passthrough)),
        )
        .route(
            "/api/spotgo/direct/vehicles/",
            guard(GET_PUT_DELETE, any(spotgo::missing_id)),
        )
        // Proxy call log
        .route("/api/admin/proxy/logs", guard(GET_ONLY, get(logs::get_proxy_logs)))
        .route(
            "/api/admin/proxy/logs/clear",
            guard(POST_ONLY, post(logs::clear_proxy_logs)),
        )
        // Health
        .route("/healthz", get(health_check))
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
