// SPDX-License-Identifier: MIT
// Copyright 2026 complejos-backend contributors

//! Uniform JSON envelope and lenient JSON body parsing.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::AppError;

/// Success envelope: `{status, code, message, data?, token?}`.
///
/// Errors use the same shape through [`AppError`].
#[derive(Debug)]
pub struct ApiResponse<T> {
    code: StatusCode,
    message: String,
    data: Option<T>,
    token: Option<String>,
}

#[derive(Serialize)]
struct Envelope<T> {
    status: &'static str,
    code: u16,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
            token: None,
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, message)
    }

    pub fn created(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CREATED, message)
    }

    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = Envelope {
            status: "success",
            code: self.code.as_u16(),
            message: self.message,
            data: self.data,
            token: self.token,
        };
        (self.code, Json(body)).into_response()
    }
}

/// Parse a request body as JSON, regardless of `Content-Type`.
pub fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON format: {}", e)))
}

/// Largest accepted request body. MongoDB caps a document at 16 MiB, and a
/// profile carries its photo inline.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Raw body extractor rejecting with the error envelope.
///
/// Handlers that check roles before looking at the payload take this instead
/// of [`JsonBody`].
pub struct RawBody(pub Bytes);

impl<S> FromRequest<S> for RawBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Bytes::from_request(req, state)
            .await
            .map(RawBody)
            .map_err(body_rejection)
    }
}

fn body_rejection(rejection: BytesRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!(error = %rejection.body_text(), "Request body too large");
        AppError::PayloadTooLarge(rejection.body_text())
    } else {
        AppError::BadRequest(rejection.body_text())
    }
}

/// JSON body extractor rejecting with the error envelope.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let RawBody(body) = RawBody::from_request(req, state).await?;
        parse_json(&body).map(JsonBody)
    }
}
