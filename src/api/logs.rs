use axum::{
    extract::{Query, State},
    response::Response,
    Json,
};
use std::sync::Arc;

use super::common::{message, PageParams};
use crate::proxy::middleware::AdminPrincipal;
use crate::proxy::ProxyLogEntry;
use crate::state::AppState;

#[derive(serde::Serialize)]
pub struct LogsResponse {
    pub logs: Vec<ProxyLogEntry>,
    pub total: usize,
}

pub async fn get_proxy_logs(
    State(state): State<Arc<AppState>>,
    AdminPrincipal(_admin): AdminPrincipal,
    Query(params): Query<PageParams>,
) -> Json<LogsResponse> {
    let limit = params.limit.unwrap_or(100);
    let offset = params.offset.unwrap_or(0);
    let logs = state.log_store.get_logs(limit, offset);
    let total = state.log_store.len();

    Json(LogsResponse { logs, total })
}

pub async fn clear_proxy_logs(
    State(state): State<Arc<AppState>>,
    AdminPrincipal(admin): AdminPrincipal,
) -> Response {
    state.log_store.clear();
    tracing::info!(admin = %admin.id, "Proxy logs cleared");
    message("Proxy logs cleared.")
}
