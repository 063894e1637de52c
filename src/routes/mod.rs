// SPDX-License-Identifier: MIT
// Copyright 2026 complejos-backend contributors

//! HTTP route handlers.

pub mod complejo;
pub mod envelope;
pub mod event;
pub mod patch;

use crate::middleware::auth::require_auth;
use crate::routes::envelope::MAX_BODY_BYTES;
use crate::AppState;
use axum::http::{header, Method};
use axum::{extract::DefaultBodyLimit, middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Serialize)]
pub struct LivenessResponse {
    pub content: String,
}

/// Liveness probe
async fn liveness() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        content: "Server is running!".to_string(),
    })
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - allow requests from frontend URL and localhost (for dev)
    let frontend_url = state.config.frontend_url.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str == frontend_url
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/test", get(liveness))
        .merge(complejo::public_routes())
        .merge(event::public_routes());

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .merge(complejo::protected_routes())
        .merge(event::protected_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
