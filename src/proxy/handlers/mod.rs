// Handlers 模块 - 上游代理端点处理器

pub mod spotgo;
