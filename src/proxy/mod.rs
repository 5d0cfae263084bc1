// proxy 模块 - 上游反代服务

pub mod handlers; // API 端点处理器
pub mod log_store; // 日志存储
pub mod mappers; // 响应转换
pub mod middleware; // Axum 中间件
pub mod upstream; // 上游客户端

pub use log_store::{LogStore, ProxyLogEntry};
