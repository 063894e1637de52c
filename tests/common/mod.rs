// SPDX-License-Identifier: MIT
// Copyright 2026 complejos-backend contributors

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use complejos_backend::config::Config;
use complejos_backend::db::DocumentDb;
use complejos_backend::routes::create_router;
use complejos_backend::AppState;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Create a test app backed by the in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    let config = Config::test_default();
    let state = Arc::new(AppState::new(config, DocumentDb::in_memory()));
    (create_router(state.clone()), state)
}

/// Sign a token with arbitrary claims and algorithm.
#[allow(dead_code)]
pub fn sign_claims(claims: &Value, algorithm: Algorithm, secret: &[u8]) -> String {
    encode(
        &Header::new(algorithm),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .unwrap()
}

/// Create a test JWT carrying the three identity claims.
#[allow(dead_code)]
pub fn create_test_jwt(id: &str, username: &str, role: &str, secret: &[u8]) -> String {
    sign_claims(
        &json!({ "_id": id, "username": username, "role": role }),
        Algorithm::HS256,
        secret,
    )
}

/// Build a request with an optional token and raw body.
#[allow(dead_code)]
pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<String>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send a request and decode the JSON response body.
#[allow(dead_code)]
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Send a JSON body.
#[allow(dead_code)]
pub async fn send_json(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    send(app, request(method, uri, token, Some(body.to_string()))).await
}

/// Register a Complejo through the API, returning (id, token).
#[allow(dead_code)]
pub async fn create_complejo(app: &Router, username: &str, role: &str) -> (String, String) {
    let (status, body) = send_json(
        app,
        Method::POST,
        "/complejo",
        None,
        json!({
            "username": username,
            "password": "hunter2",
            "role": role,
            "weight": "70",
            "height": "1.8",
            "gender": "male"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);

    (
        body["data"]["_id"].as_str().unwrap().to_string(),
        body["token"].as_str().unwrap().to_string(),
    )
}

/// Create an Event as `admin_token`, returning its id.
#[allow(dead_code)]
pub async fn create_event(app: &Router, admin_token: &str, title: &str) -> String {
    let (status, body) = send_json(
        app,
        Method::POST,
        "/event",
        Some(admin_token),
        json!({
            "title": title,
            "description": "A gathering of fitness enthusiasts.",
            "date": "2025-02-01T10:00:00Z",
            "location": "Local Gym, Main Street"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create event failed: {}", body);

    body["data"]["_id"].as_str().unwrap().to_string()
}
