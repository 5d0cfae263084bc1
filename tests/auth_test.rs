// ============================================================================
// Authentication tests
// ============================================================================
//
// - POST /api/auth/login (Supabase password grant)
// - GET  /api/users/me (local JWT check)
// - remote session check on admin routes
//
// ============================================================================

use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;
use common::{mint_token, spawn_app, valid_token, DISPATCHER_ID, ORPHAN_ID, TEAM_ID};

#[tokio::test]
async fn login_returns_session_token_and_user() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "email": "dispatch@rossik.eu", "password": "correct-horse" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["token"], "session-token");
    assert_eq!(body["user"]["id"], DISPATCHER_ID);
    assert_eq!(body["user"]["email"], "dispatch@rossik.eu");
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "email": "dispatch@rossik.eu", "password": "guess" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Unauthorized" }));
}

#[tokio::test]
async fn login_requires_email_and_password() {
    let app = spawn_app().await;

    for body in [
        json!({ "email": "dispatch@rossik.eu" }),
        json!({ "password": "correct-horse" }),
        json!({ "email": "   ", "password": "correct-horse" }),
    ] {
        let response = app
            .client
            .post(app.url("/api/auth/login"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", body);
    }
}

#[tokio::test]
async fn login_body_errors_are_json_400s() {
    let app = spawn_app().await;

    let no_body = app
        .client
        .post(app.url("/api/auth/login"))
        .send()
        .await
        .unwrap();
    assert_eq!(no_body.status(), StatusCode::BAD_REQUEST);
    let body: Value = no_body.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Expected a JSON request body" }));

    let mistyped = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "email": 5, "password": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(mistyped.status(), StatusCode::BAD_REQUEST);
    let body: Value = mistyped.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "error": "Request body has missing or mistyped fields" })
    );
}

#[tokio::test]
async fn me_returns_profile_for_valid_token() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/api/users/me"))
        .bearer_auth(valid_token())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["id"], DISPATCHER_ID);
    assert_eq!(body["role"], "dispatcher");
    assert_eq!(body["team_id"], TEAM_ID);
}

#[tokio::test]
async fn me_without_profile_row_is_not_found() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/api/users/me"))
        .bearer_auth(mint_token(ORPHAN_ID, 3600))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn me_rejects_bad_tokens_with_empty_401() {
    let app = spawn_app().await;

    let forged = {
        let mut token = valid_token();
        token.push('x');
        token
    };
    let cases: Vec<(&str, Option<String>)> = vec![
        ("missing", None),
        ("expired", Some(format!("Bearer {}", mint_token(DISPATCHER_ID, -3600)))),
        ("forged", Some(format!("Bearer {}", forged))),
        ("wrong scheme", Some(format!("Basic {}", valid_token()))),
        ("non-uuid subject", Some(format!("Bearer {}", mint_token("service-account", 3600)))),
    ];

    for (name, authorization) in cases {
        let mut request = app.client.get(app.url("/api/users/me"));
        if let Some(value) = authorization {
            request = request.header("authorization", value);
        }
        let response = request.send().await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", name);
        assert!(response.text().await.unwrap().is_empty(), "{}", name);
    }
}

#[tokio::test]
async fn local_token_check_without_secret_is_a_500() {
    let app = common::spawn_app_with(|config| config.jwt_secret = None).await;

    let response = app
        .client
        .get(app.url("/api/users/me"))
        .bearer_auth(valid_token())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn admin_routes_check_session_and_role() {
    let app = spawn_app().await;

    let cases = [
        ("admin-token", StatusCode::OK),
        ("dispatcher-token", StatusCode::FORBIDDEN),
        ("orphan-token", StatusCode::FORBIDDEN),
        ("revoked-token", StatusCode::UNAUTHORIZED),
    ];
    for (token, expected) in cases {
        let response = app
            .client
            .get(app.url("/api/admin/users"))
            .bearer_auth(token)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), expected, "{}", token);
    }

    let anonymous = app
        .client
        .get(app.url("/api/admin/users"))
        .send()
        .await
        .unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_check_is_public() {
    let app = spawn_app().await;

    let response = app.client.get(app.url("/healthz")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}
