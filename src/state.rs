use std::sync::Arc;

use crate::core::config::AppConfig;
use crate::core::services::SupabaseClient;
use crate::error::{AppError, AppResult};
use crate::proxy::middleware::auth::JwtVerifier;
use crate::proxy::upstream::UpstreamClient;
use crate::proxy::LogStore;

/// Web 应用状态
///
/// Built once at startup; nothing in it changes while serving.
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub supabase: SupabaseClient,
    pub upstream: UpstreamClient,
    /// `None` when no JWT secret is configured; locally protected routes then answer 500.
    pub jwt: Option<JwtVerifier>,
    pub log_store: Arc<LogStore>,
}

impl AppState {
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let log_store = Arc::new(LogStore::new(config.proxy_log_capacity));
        let timeout = config.upstream_timeout();

        let supabase = SupabaseClient::new(&config.supabase, timeout)?;
        let upstream = UpstreamClient::new(&config.spotgo.base_url, timeout, log_store.clone())?;
        let jwt = config
            .jwt_secret
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|secret| JwtVerifier::new(secret, config.jwt_audience.as_deref()));

        Ok(Self {
            config: Arc::new(config),
            supabase,
            upstream,
            jwt,
            log_store,
        })
    }

    pub fn spotgo_api_key(&self) -> AppResult<&str> {
        non_blank(&self.config.spotgo.api_key, "SPOTGO_API_KEY")
    }

    pub fn spotgo_owner(&self) -> AppResult<&str> {
        non_blank(&self.config.spotgo.owner_email, "SPOTGO_OWNER_EMAIL")
    }
}

fn non_blank<'a>(value: &'a Option<String>, name: &str) -> AppResult<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Config(format!("{} is not configured", name)))
}
