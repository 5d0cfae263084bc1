//! 外部认证 / 数据库服务客户端
//! Supabase auth (GoTrue) and table access (PostgREST) over HTTPS.

use axum::http::{Method, StatusCode};
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;
use uuid::Uuid;

use crate::core::config::SupabaseConfig;
use crate::core::models::{AuthUser, LoginResponse};
use crate::error::{AppError, AppResult};
use crate::proxy::mappers::error_classifier::classify_transport_error;
use crate::proxy::middleware::auth::AuthError;

#[derive(Debug, Deserialize)]
struct SessionResponse {
    access_token: String,
    #[serde(default)]
    user: Value,
}

pub struct SupabaseClient {
    http_client: Client,
    base_url: Url,
    anon_key: String,
    service_role_key: String,
}

fn required(value: &Option<String>, name: &str) -> AppResult<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::Config(format!("{} is not configured", name)))
}

impl SupabaseClient {
    pub fn new(config: &SupabaseConfig, timeout: Duration) -> AppResult<Self> {
        let url = required(&config.url, "SUPABASE_URL")?;
        let base_url = Url::parse(&url)
            .map_err(|e| AppError::Config(format!("invalid SUPABASE_URL {}: {}", url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!("SUPABASE_URL {} cannot carry a path", url)));
        }

        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
            anon_key: required(&config.anon_key, "SUPABASE_ANON_KEY")?,
            service_role_key: required(&config.service_role_key, "SUPABASE_SERVICE_ROLE_KEY")?,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Table request authorized with the service-role key
    fn rest(&self, method: Method, table: &str) -> RequestBuilder {
        self.http_client
            .request(method, self.endpoint(&["rest", "v1", table]))
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
    }

    /// Password sign-in; returns the session token and the user record.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> AppResult<LoginResponse> {
        let mut url = self.endpoint(&["auth", "v1", "token"]);
        url.query_pairs_mut().append_pair("grant_type", "password");

        let response = self
            .http_client
            .post(url)
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            tracing::info!("Sign-in rejected for {}", email);
            return Err(AuthError::InvalidCredentials.into());
        }
        if !status.is_success() {
            return Err(AppError::UpstreamUnavailable(format!(
                "auth service sign-in responded {}",
                status
            )));
        }

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Parse session failed: {}", e)))?;
        Ok(LoginResponse {
            token: session.access_token,
            user: session.user,
        })
    }

    /// Resolves an access token to the identity it was issued for.
    pub async fn get_user(&self, access_token: &str) -> AppResult<AuthUser> {
        let response = self
            .http_client
            .get(self.endpoint(&["auth", "v1", "user"]))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AuthError::InvalidToken.into());
        }
        if !status.is_success() {
            return Err(AppError::UpstreamUnavailable(format!(
                "auth service user lookup responded {}",
                status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Parse user failed: {}", e)))
    }

    /// `GET /rest/v1/{table}` with PostgREST query filters, e.g. `("id", "eq.<uuid>")`.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> AppResult<Vec<T>> {
        let response = self
            .rest(Method::GET, table)
            .query(filters)
            .send()
            .await
            .map_err(classify_transport_error)?;
        parse_rows(table, response).await
    }

    pub async fn insert<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        table: &str,
        row: &B,
    ) -> AppResult<T> {
        let response = self
            .rest(Method::POST, table)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await
            .map_err(classify_transport_error)?;
        first_row(table, parse_rows(table, response).await?)
    }

    pub async fn update<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        table: &str,
        id: Uuid,
        row: &B,
    ) -> AppResult<T> {
        let response = self
            .rest(Method::PATCH, table)
            .header("Prefer", "return=representation")
            .query(&[("id", format!("eq.{}", id))])
            .json(row)
            .send()
            .await
            .map_err(classify_transport_error)?;
        first_row(table, parse_rows(table, response).await?)
    }

    pub async fn delete(&self, table: &str, id: Uuid) -> AppResult<()> {
        let response = self
            .rest(Method::DELETE, table)
            .header("Prefer", "return=representation")
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await
            .map_err(classify_transport_error)?;
        let deleted: Vec<Value> = parse_rows(table, response).await?;
        if deleted.is_empty() {
            return Err(AppError::NotFound(format!("No {} row with id {}", table, id)));
        }
        Ok(())
    }
}

async fn parse_rows<T: DeserializeOwned>(table: &str, response: Response) -> AppResult<Vec<T>> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| AppError::Database(format!("{}: failed to read body: {}", table, e)))?;

    if status == StatusCode::CONFLICT {
        return Err(AppError::Conflict(format!("Duplicate {} record", table)));
    }
    if !status.is_success() {
        return Err(AppError::Database(format!("{} responded {}: {}", table, status, text)));
    }
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&text)
        .map_err(|e| AppError::Database(format!("{}: unexpected row shape: {}", table, e)))
}

fn first_row<T>(table: &str, rows: Vec<T>) -> AppResult<T> {
    rows.into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound(format!("No matching {} row", table)))
}
