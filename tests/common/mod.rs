// ============================================================================
// Test Utilities
// ============================================================================
//
// Spawns the real application next to two in-process fakes:
// - a SpotGo marketplace that records every request it receives
// - a Supabase project (auth + PostgREST) with a fixed set of users/teams
//
// ============================================================================

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{any, get, post},
    Json, Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use logistics_server::core::config::{AppConfig, SpotGoConfig, SupabaseConfig};
use logistics_server::proxy::middleware::auth::Claims;
use logistics_server::state::AppState;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

pub const JWT_SECRET: &str = "integration-test-secret";
pub const SPOTGO_KEY: &str = "spotgo-test-key";
pub const OWNER_EMAIL: &str = "spot.loads@rossik.eu";

pub const ADMIN_ID: &str = "a0000000-0000-4000-8000-000000000001";
pub const DISPATCHER_ID: &str = "d0000000-0000-4000-8000-000000000002";
pub const ORPHAN_ID: &str = "00000000-0000-4000-8000-0000000000ff";
pub const TEAM_ID: &str = "7e000000-0000-4000-8000-000000000010";
pub const TEAM_LEAD_ID: &str = "d0000000-0000-4000-8000-000000000002";

/// "café" in ISO-8859-1, not valid UTF-8
pub const LATIN1_ERROR: &[u8] = &[0x63, 0x61, 0x66, 0xe9];

/// One request as seen by the fake marketplace
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("upstream body should be JSON")
    }
}

pub type Recorder = Arc<Mutex<Vec<Recorded>>>;

pub struct TestApp {
    pub address: String,
    pub spotgo: Recorder,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub fn upstream_requests(&self) -> Vec<Recorded> {
        self.spotgo.lock().unwrap().clone()
    }
}

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

// ---------------------------------------------------------------------------
// Fake SpotGo
// ---------------------------------------------------------------------------

async fn spotgo_handler(
    State(recorder): State<Recorder>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body = String::from_utf8_lossy(&body).to_string();
    let path = uri.path().trim_start_matches("/api/v1").to_string();
    recorder.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        headers: headers.clone(),
        body: body.clone(),
    });

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match (method.as_str(), segments.as_slice()) {
        ("POST", ["freights"]) => {
            let weight = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("weight").and_then(Value::as_i64));
            match weight {
                Some(-1) => {
                    tokio::time::sleep(Duration::from_secs(3)).await;
                    (StatusCode::CREATED, Json(json!({ "id": "late" }))).into_response()
                }
                Some(0) => (StatusCode::UNPROCESSABLE_ENTITY, "weight must be positive")
                    .into_response(),
                Some(2) => (
                    StatusCode::BAD_REQUEST,
                    [(header::CONTENT_TYPE, "text/plain; charset=iso-8859-1")],
                    Bytes::from_static(LATIN1_ERROR),
                )
                    .into_response(),
                _ => (StatusCode::CREATED, Json(json!({ "id": "f1" }))).into_response(),
            }
        }
        ("POST", ["vehicles"]) => (StatusCode::OK, "created").into_response(),
        ("DELETE", ["freights", "bad"]) => (StatusCode::NOT_FOUND, "not found").into_response(),
        ("DELETE", ["freights", _]) | ("DELETE", ["vehicles", _])
            if headers.contains_key("x-api-key") =>
        {
            StatusCode::NO_CONTENT.into_response()
        }
        (_, ["vehicles", id]) => {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            if auth == "Bearer denied" {
                return (StatusCode::FORBIDDEN, Json(json!({ "message": "denied" })))
                    .into_response();
            }
            Json(json!({ "id": id, "method": method.as_str() })).into_response()
        }
        _ => (StatusCode::NOT_FOUND, "no such route").into_response(),
    }
}

// ---------------------------------------------------------------------------
// Fake Supabase
// ---------------------------------------------------------------------------

fn profiles() -> Vec<Value> {
    vec![
        json!({ "id": ADMIN_ID, "role": "admin", "team_id": null, "email": "admin@rossik.eu" }),
        json!({ "id": DISPATCHER_ID, "role": "dispatcher", "team_id": TEAM_ID, "email": "dispatch@rossik.eu" }),
    ]
}

fn teams() -> Vec<Value> {
    vec![json!({ "id": TEAM_ID, "name": "Spot Desk", "type": "spot", "lead_id": TEAM_LEAD_ID })]
}

fn bearer(headers: &HeaderMap) -> &str {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default()
}

async fn sign_in(Json(body): Json<Value>) -> Response {
    if body["password"] == "correct-horse" {
        Json(json!({
            "access_token": "session-token",
            "token_type": "bearer",
            "user": { "id": DISPATCHER_ID, "email": body["email"] }
        }))
        .into_response()
    } else {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": "invalid_grant" }))).into_response()
    }
}

async fn auth_user(headers: HeaderMap) -> Response {
    let id = match bearer(&headers) {
        "admin-token" => ADMIN_ID,
        "dispatcher-token" => DISPATCHER_ID,
        "orphan-token" => ORPHAN_ID,
        _ => return (StatusCode::UNAUTHORIZED, Json(json!({ "msg": "bad jwt" }))).into_response(),
    };
    Json(json!({ "id": id, "email": "someone@rossik.eu" })).into_response()
}

fn id_filter(params: &HashMap<String, String>) -> Option<String> {
    params
        .get("id")
        .and_then(|f| f.strip_prefix("eq."))
        .map(str::to_string)
}

fn filter_rows(rows: Vec<Value>, params: &HashMap<String, String>) -> Vec<Value> {
    match id_filter(params) {
        Some(id) => rows.into_iter().filter(|r| r["id"] == id.as_str()).collect(),
        None => rows,
    }
}

async fn rest(
    method: Method,
    axum::extract::Path(table): axum::extract::Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if bearer(&headers) != "service-role" {
        return (StatusCode::UNAUTHORIZED, "service key required").into_response();
    }
    let rows = match table.as_str() {
        "users" => profiles(),
        "teams" => teams(),
        "trucks" => Vec::new(),
        _ => return StatusCode::NOT_FOUND.into_response(),
    };
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    match method.as_str() {
        "GET" => Json(filter_rows(rows, &params)).into_response(),
        "POST" => {
            if payload["plate"] == "DUP-001" {
                return (StatusCode::CONFLICT, Json(json!({ "code": "23505" }))).into_response();
            }
            let mut row = payload;
            row["id"] = json!("11111111-1111-4111-8111-111111111111");
            (StatusCode::CREATED, Json(json!([row]))).into_response()
        }
        "PATCH" => {
            let mut matched = filter_rows(rows, &params);
            for row in matched.iter_mut() {
                if let (Some(row), Some(update)) = (row.as_object_mut(), payload.as_object()) {
                    for (k, v) in update {
                        row.insert(k.clone(), v.clone());
                    }
                }
            }
            Json(matched).into_response()
        }
        "DELETE" => Json(filter_rows(rows, &params)).into_response(),
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub fn mint_token(sub: &str, exp_offset_secs: i64) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        email: Some("dispatch@rossik.eu".to_string()),
        role: Some("authenticated".to_string()),
        exp: (chrono::Utc::now().timestamp() + exp_offset_secs) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn valid_token() -> String {
    mint_token(DISPATCHER_ID, 3600)
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

pub async fn spawn_app_with(customize: impl FnOnce(&mut AppConfig)) -> TestApp {
    let recorder: Recorder = Arc::new(Mutex::new(Vec::new()));
    let spotgo_address = serve(
        Router::new()
            .fallback(spotgo_handler)
            .with_state(recorder.clone()),
    )
    .await;
    let supabase_address = serve(
        Router::new()
            .route("/auth/v1/token", post(sign_in))
            .route("/auth/v1/user", get(auth_user))
            .route("/rest/v1/:table", any(rest)),
    )
    .await;

    let mut config = AppConfig {
        supabase: SupabaseConfig {
            url: Some(supabase_address),
            anon_key: Some("anon".to_string()),
            service_role_key: Some("service-role".to_string()),
        },
        spotgo: SpotGoConfig {
            base_url: format!("{}/api/v1", spotgo_address),
            api_key: Some(SPOTGO_KEY.to_string()),
            owner_email: Some(OWNER_EMAIL.to_string()),
        },
        jwt_secret: Some(JWT_SECRET.to_string()),
        upstream_timeout_secs: 1,
        ..AppConfig::default()
    };
    customize(&mut config);

    let state = Arc::new(AppState::new(config).expect("state should build"));
    let address = serve(logistics_server::build_app(state, None)).await;

    TestApp {
        address,
        spotgo: recorder,
        client: reqwest::Client::new(),
    }
}
