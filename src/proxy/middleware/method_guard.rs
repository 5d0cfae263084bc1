// HTTP method allow-list guard
use axum::{
    extract::{Request, State},
    http::Method,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::MethodRouter,
};

use crate::error::AppError;

pub const POST_ONLY: &[Method] = &[Method::POST];
pub const DELETE_ONLY: &[Method] = &[Method::DELETE];
pub const GET_ONLY: &[Method] = &[Method::GET];
pub const GET_POST: &[Method] = &[Method::GET, Method::POST];
pub const PUT_DELETE: &[Method] = &[Method::PUT, Method::DELETE];
pub const GET_PUT_DELETE: &[Method] = &[Method::GET, Method::PUT, Method::DELETE];

/// Rejects any method outside `allowed` with 405 and an `Allow` header
pub async fn method_guard(
    State(allowed): State<&'static [Method]>,
    request: Request,
    next: Next,
) -> Response {
    if allowed.contains(request.method()) {
        return next.run(request).await;
    }
    tracing::debug!(
        "Rejected {} {}: method not allowed",
        request.method(),
        request.uri().path()
    );
    AppError::MethodNotAllowed {
        method: request.method().clone(),
        allowed,
    }
    .into_response()
}

/// Wraps a method router so the guard runs before anything else on the route,
/// including per-route auth layers.
pub fn guard<S>(allowed: &'static [Method], router: MethodRouter<S>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(allowed, method_guard))
}
