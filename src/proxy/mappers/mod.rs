// Mappers 模块 - 上游响应与错误转换

pub mod error_classifier;
pub mod spotgo;
