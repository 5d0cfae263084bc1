pub mod api;
pub mod core;
pub mod error;
pub mod proxy;
pub mod state;

use axum::Router;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};

use crate::state::AppState;

/// Full application router: API routes, request logging, CORS and, when
/// `static_dir` holds a frontend build, SPA fallback to its `index.html`.
pub fn build_app(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    let app = Router::new()
        .merge(api::build_routes(state))
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(api::common::request_logger));

    match static_dir {
        Some(static_dir) => {
            let index_path = static_dir.join("index.html");
            if static_dir.exists() && index_path.exists() {
                tracing::info!("Serving static files from {:?}", static_dir);
                let serve_dir =
                    ServeDir::new(static_dir).not_found_service(ServeFile::new(&index_path));
                app.fallback_service(serve_dir)
            } else {
                tracing::warn!("Static directory {:?} or index.html not found", static_dir);
                app
            }
        }
        None => app,
    }
}
