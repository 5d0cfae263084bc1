// Upstream client for the freight marketplace (SpotGo) REST API
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use reqwest::Client;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

use crate::error::{AppError, AppResult};
use crate::proxy::log_store::LogStore;
use crate::proxy::mappers::error_classifier::{classify_transport_error, error_kind};

pub const API_VERSION: &str = "1.0";
pub const API_VERSION_HEADER: &str = "x-api-version";
pub const API_KEY_HEADER: &str = "x-api-key";

/// Raw upstream answer: status, content type and body bytes, nothing interpreted yet
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl UpstreamResponse {
    /// Lossy UTF-8 view of the body for logs and JSON parsing
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Status, content type and body exactly as received
impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> Response {
        let mut local = (self.status, self.body).into_response();
        match self.content_type {
            Some(content_type) => {
                local.headers_mut().insert(header::CONTENT_TYPE, content_type);
            }
            None => {
                local.headers_mut().remove(header::CONTENT_TYPE);
            }
        }
        local
    }
}

pub struct UpstreamClient {
    http_client: Client,
    base_url: Url,
    log_store: Arc<LogStore>,
}

impl UpstreamClient {
    pub fn new(base_url: &str, timeout: Duration, log_store: Arc<LogStore>) -> AppResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("invalid SpotGo base URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "SpotGo base URL {} cannot carry a path",
                base_url
            )));
        }

        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("logistics-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
            log_store,
        })
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    pub fn build_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Headers for calls made with the server-held API key
    pub fn api_key_headers(api_key: &str) -> AppResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(
            HeaderName::from_static(API_VERSION_HEADER),
            HeaderValue::from_static(API_VERSION),
        );
        headers.insert(
            HeaderName::from_static(API_KEY_HEADER),
            HeaderValue::from_str(api_key)
                .map_err(|_| AppError::Config("SpotGo API key is not a valid header value".into()))?,
        );
        Ok(headers)
    }

    /// Sends one request and reads the whole body.
    ///
    /// Non-success statuses are returned, not turned into errors; only transport
    /// failures are errors here.
    pub async fn send(
        &self,
        method: Method,
        segments: &[&str],
        headers: HeaderMap,
        body: Option<Bytes>,
    ) -> AppResult<UpstreamResponse> {
        let url = self.build_url(segments);
        let started = Instant::now();

        let mut request = self
            .http_client
            .request(method.clone(), url.clone())
            .headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let result = match request.send().await {
            Ok(response) => {
                let status = response.status();
                let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
                response.bytes().await.map(|body| UpstreamResponse {
                    status,
                    content_type,
                    body,
                })
            }
            Err(e) => Err(e),
        };

        let latency_ms = started.elapsed().as_millis() as u32;
        match result {
            Ok(response) => {
                let error = (!response.status.is_success()).then(|| response.text().into_owned());
                self.log_store.record(
                    method.to_string(),
                    url.to_string(),
                    response.status.as_u16(),
                    latency_ms,
                    error,
                );
                Ok(response)
            }
            Err(e) => {
                self.log_store.record(
                    method.to_string(),
                    url.to_string(),
                    0,
                    latency_ms,
                    Some(error_kind(&e).to_string()),
                );
                Err(classify_transport_error(e))
            }
        }
    }
}
