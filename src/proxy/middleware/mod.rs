// Middleware 模块 - Axum 中间件

pub mod auth;
pub mod method_guard;

pub use auth::{protect, AdminPrincipal, Principal};
pub use method_guard::guard;
