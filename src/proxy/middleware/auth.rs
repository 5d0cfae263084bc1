// Bearer-token authentication
//
// Two strategies:
// - `protect`: local HS256 signature + expiry check, never leaves the process.
//   Success attaches `Claims` to the request; failure is a bare 401.
// - `get_user_with_role`: resolves the token with the auth service, then loads
//   the `users` profile row. 401 for a bad token, 403 without a profile.
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::core::models::Profile;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing authorization header")]
    MissingToken,
    #[error("authorization header is not a bearer token")]
    MalformedHeader,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("no profile for authenticated user")]
    ProfileNotFound,
    #[error("insufficient role")]
    Forbidden,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::ProfileNotFound | AuthError::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

/// Decoded claims of a verified access token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub exp: usize,
}

/// Extracts the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedHeader)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }
    Ok(token)
}

/// HS256 verifier built once from the shared secret
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str, audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Signature, expiry and a UUID `sub`; profile rows are keyed by that id.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = jsonwebtoken::decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("JWT verification failed: {}", e);
                AuthError::InvalidToken
            })?;
        if Uuid::parse_str(&claims.sub).is_err() {
            tracing::debug!("JWT subject is not a user id");
            return Err(AuthError::InvalidToken);
        }
        Ok(claims)
    }

    pub fn verify_headers(&self, headers: &HeaderMap) -> Result<Claims, AuthError> {
        self.verify(bearer_token(headers)?)
    }
}

/// Local signed-token guard
pub async fn protect(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(verifier) = state.jwt.as_ref() else {
        return AppError::Config("JWT_SECRET is not configured".to_string()).into_response();
    };
    match verifier.verify_headers(request.headers()) {
        Ok(claims) => {
            tracing::trace!(sub = %claims.sub, "Bearer token verified");
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(path = %request.uri().path(), "Rejected request: {}", e);
            e.status().into_response()
        }
    }
}

/// Remote verification + profile lookup
pub async fn get_user_with_role(state: &AppState, headers: &HeaderMap) -> AppResult<Profile> {
    let token = bearer_token(headers)?;
    let user = state.supabase.get_user(token).await?;
    let profiles: Vec<Profile> = state
        .supabase
        .select(
            "users",
            &[
                ("select", "id,role,team_id".to_string()),
                ("id", format!("eq.{}", user.id)),
            ],
        )
        .await?;
    profiles.into_iter().next().ok_or_else(|| {
        tracing::warn!(user_id = %user.id, "Authenticated user has no profile row");
        AuthError::ProfileNotFound.into()
    })
}

/// Any user with a profile row
#[derive(Debug, Clone)]
pub struct Principal(pub Profile);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        get_user_with_role(state, &parts.headers).await.map(Principal)
    }
}

/// A principal whose role is `admin`
#[derive(Debug, Clone)]
pub struct AdminPrincipal(pub Profile);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminPrincipal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let profile = get_user_with_role(state, &parts.headers).await?;
        if !profile.is_admin() {
            tracing::warn!(user_id = %profile.id, "Non-admin attempted admin route");
            return Err(AuthError::Forbidden.into());
        }
        Ok(AdminPrincipal(profile))
    }
}
