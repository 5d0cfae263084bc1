//! 核心模块
//! 配置、日志、数据模型与外部服务客户端

pub mod config;
pub mod logger;
pub mod models;
pub mod services;
