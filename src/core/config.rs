//! 应用配置
//! Loaded once at startup from CLI flags / environment and shared read-only.

use clap::{Args, Parser};
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_SPOTGO_BASE_URL: &str = "https://api.spotgo.eu/api/v1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required settings: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("invalid setting {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// External auth/database service (Supabase) settings
#[derive(Args, Debug, Clone, Default)]
pub struct SupabaseConfig {
    #[arg(long = "supabase-url", env = "SUPABASE_URL")]
    pub url: Option<String>,

    #[arg(long = "supabase-anon-key", env = "SUPABASE_ANON_KEY", hide_env_values = true)]
    pub anon_key: Option<String>,

    #[arg(
        long = "supabase-service-role-key",
        env = "SUPABASE_SERVICE_ROLE_KEY",
        hide_env_values = true
    )]
    pub service_role_key: Option<String>,
}

/// Freight marketplace (SpotGo) settings
#[derive(Args, Debug, Clone)]
pub struct SpotGoConfig {
    #[arg(long = "spotgo-base-url", env = "SPOTGO_BASE_URL", default_value = DEFAULT_SPOTGO_BASE_URL)]
    pub base_url: String,

    #[arg(long = "spotgo-api-key", env = "SPOTGO_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Identity written into the `owner` field of every submitted resource
    #[arg(long = "spotgo-owner-email", env = "SPOTGO_OWNER_EMAIL")]
    pub owner_email: Option<String>,
}

impl Default for SpotGoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SPOTGO_BASE_URL.to_string(),
            api_key: None,
            owner_email: None,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct AppConfig {
    #[arg(short, long, env = "PORT", default_value_t = 3001)]
    pub port: u16,

    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0")]
    pub bind_address: IpAddr,

    /// Directory containing static frontend files (for production)
    #[arg(long, env = "STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Enables daily rolling file logs in this directory
    #[arg(long, env = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(flatten)]
    pub supabase: SupabaseConfig,

    #[command(flatten)]
    pub spotgo: SpotGoConfig,

    /// Shared secret for local bearer-token verification
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    #[arg(long, env = "JWT_AUDIENCE")]
    pub jwt_audience: Option<String>,

    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 10)]
    pub upstream_timeout_secs: u64,

    #[arg(long, env = "PROXY_LOG_CAPACITY", default_value_t = 500)]
    pub proxy_log_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            bind_address: IpAddr::from([0, 0, 0, 0]),
            static_dir: None,
            log_dir: None,
            supabase: SupabaseConfig::default(),
            spotgo: SpotGoConfig::default(),
            jwt_secret: None,
            jwt_audience: None,
            upstream_timeout_secs: 10,
            proxy_log_capacity: 500,
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).unwrap_or_default().is_empty()
}

impl AppConfig {
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    /// Checks every setting the server cannot run without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("SUPABASE_URL", &self.supabase.url),
            ("SUPABASE_ANON_KEY", &self.supabase.anon_key),
            ("SUPABASE_SERVICE_ROLE_KEY", &self.supabase.service_role_key),
            ("JWT_SECRET", &self.jwt_secret),
            ("SPOTGO_API_KEY", &self.spotgo.api_key),
            ("SPOTGO_OWNER_EMAIL", &self.spotgo.owner_email),
        ];
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| is_blank(value))
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        if self.upstream_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "UPSTREAM_TIMEOUT_SECS",
                reason: "must be at least 1 second".to_string(),
            });
        }

        for (name, value) in [
            ("SUPABASE_URL", self.supabase.url.as_deref().unwrap_or_default()),
            ("SPOTGO_BASE_URL", self.spotgo.base_url.as_str()),
        ] {
            url::Url::parse(value).map_err(|e| ConfigError::Invalid {
                name,
                reason: e.to_string(),
            })?;
        }

        Ok(())
    }
}
