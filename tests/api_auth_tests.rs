// SPDX-License-Identifier: MIT
// Copyright 2026 complejos-backend contributors

//! API authentication and CORS tests.
//!
//! These tests verify that:
//! 1. Protected routes reject requests without a token (401)
//! 2. Bad signatures and foreign algorithms are rejected (401) before claims
//! 3. Well-signed tokens missing a claim are forbidden (403)
//! 4. Public routes need no token

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use jsonwebtoken::Algorithm;
use serde_json::json;
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_protected_route_without_token() {
    let (app, _) = common::create_test_app();

    let (status, body) = common::send_json(&app, Method::POST, "/event", None, json!({})).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "error");
    assert_eq!(body["code"], 401);
    assert_eq!(body["message"], "Authorization token is required");
}

#[tokio::test]
async fn test_protected_route_with_invalid_token() {
    let (app, _) = common::create_test_app();

    let (status, body) = common::send(
        &app,
        common::request(Method::PUT, "/event/e1/subscribe", Some("invalid.token.here"), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid or expired token");
}

#[tokio::test]
async fn test_token_signed_with_other_secret() {
    let (app, _) = common::create_test_app();
    let token = common::create_test_jwt("id-1", "ana", "admin", b"some_other_secret");

    let (status, _) = common::send(
        &app,
        common::request(Method::PUT, "/event/e1/subscribe", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unexpected_algorithm_rejected_before_claims() {
    let (app, state) = common::create_test_app();
    // No claims at all: a claim-level check would answer 403.
    let token = common::sign_claims(&json!({}), Algorithm::HS512, &state.config.jwt_secret);

    let (status, _) = common::send(
        &app,
        common::request(Method::PUT, "/event/e1/subscribe", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_claims_forbidden() {
    let (app, state) = common::create_test_app();
    let secret = &state.config.jwt_secret;

    let cases = [
        (json!({ "_id": "1", "username": "ana" }), "Role is missing or invalid in the token"),
        (
            json!({ "_id": "1", "username": "", "role": "user" }),
            "Username is missing or invalid in the token",
        ),
        (
            json!({ "username": "ana", "role": "user" }),
            "User ID is missing or invalid in the token",
        ),
    ];

    for (claims, message) in cases {
        let token = common::sign_claims(&claims, Algorithm::HS256, secret);
        let (status, body) = common::send(
            &app,
            common::request(Method::PUT, "/event/e1/subscribe", Some(&token), None),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN, "claims {}", claims);
        assert_eq!(body["message"], message);
    }
}

#[tokio::test]
async fn test_valid_token_reaches_handler() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("id-1", "ana", "user", &state.config.jwt_secret);

    let (status, body) = common::send(
        &app,
        common::request(Method::PUT, "/event/missing/subscribe", Some(&token), None),
    )
    .await;

    // Authentication passed; the handler answers for the absent event.
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Event not found");
}

#[tokio::test]
async fn test_bearer_scheme_tolerated() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("id-1", "ana", "user", &state.config.jwt_secret);

    let (status, _) = common::send(
        &app,
        common::request(
            Method::PUT,
            "/event/missing/subscribe",
            Some(&format!("Bearer {}", token)),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_public_route_no_auth_required() {
    let (app, _) = common::create_test_app();

    let (status, body) = common::send(&app, common::request(Method::GET, "/test", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "Server is running!");

    // Listing is public; the empty collection answers 404, not 401.
    let (status, _) = common::send(&app, common::request(Method::GET, "/event", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/complejo/user")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // OPTIONS should return 200 (CORS preflight success)
    assert_eq!(response.status(), StatusCode::OK);

    // Should have CORS headers
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}
