// 错误分类模块 - 将底层传输错误转换为统一的 AppError
use reqwest::Error;

use crate::error::AppError;

/// Short label for a transport failure, used in logs and the proxy call log.
pub fn error_kind(error: &Error) -> &'static str {
    if error.is_timeout() {
        "timeout_error"
    } else if error.is_connect() {
        "connection_error"
    } else if error.is_decode() {
        "decode_error"
    } else if error.is_body() {
        "body_error"
    } else if error.is_builder() {
        "request_error"
    } else {
        "unknown_error"
    }
}

/// Maps a failed outbound call to the response the caller sees
///
/// - timeout: 504
/// - connection refused / DNS / TLS: 502
/// - anything else: 500
pub fn classify_transport_error(error: Error) -> AppError {
    let kind = error_kind(&error);
    tracing::error!("Outbound request failed ({}): {}", kind, error);
    if error.is_timeout() {
        AppError::UpstreamTimeout
    } else if error.is_connect() {
        AppError::UpstreamUnavailable(error.to_string())
    } else {
        AppError::Internal(format!("{}: {}", kind, error))
    }
}
