// SPDX-License-Identifier: MIT
// Copyright 2026 complejos-backend contributors

//! JWT authentication middleware.

use crate::error::AppError;
use crate::services::{Claims, TokenError};
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Role allowed to create events and update any record.
pub const ROLE_ADMIN: &str = "admin";
/// Role allowed to update its own profile.
pub const ROLE_USER: &str = "user";

/// Authenticated identity extracted from the token.
///
/// Inserted into request extensions by [`require_auth`]; handlers take it as
/// `Extension<AuthUser>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
    pub role: String,
}

impl AuthUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.role == role
    }

    /// Fail with 403 and `message` unless the caller has exactly `role`.
    pub fn require_role(&self, role: &str, message: &str) -> Result<(), AppError> {
        if self.has_role(role) {
            Ok(())
        } else {
            tracing::warn!(
                user_id = %self.id,
                role = %self.role,
                required = role,
                "Insufficient role"
            );
            Err(AppError::Forbidden(message.to_string()))
        }
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            username: claims.username,
            role: claims.role,
        }
    }
}

/// Middleware that requires a valid identity token.
///
/// Missing header and bad tokens give 401; a well-signed token lacking a
/// claim gives 403. Rejection halts the chain.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(|h| h.trim())
        .filter(|h| !h.is_empty())
        .ok_or_else(|| {
            tracing::warn!("Missing authorization header");
            AppError::Unauthorized("Authorization token is required".to_string())
        })?;

    // The raw token is the header value; a "Bearer " scheme is tolerated.
    let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();

    let claims = state.tokens.validate(token).map_err(|err| match err {
        TokenError::MissingClaim(_) => {
            tracing::warn!(error = %err, "Token claims rejected");
            AppError::Forbidden(err.to_string())
        }
        other => {
            tracing::warn!(error = ?other, "Token rejected");
            AppError::Unauthorized("Invalid or expired token".to_string())
        }
    })?;

    let auth_user = AuthUser::from(claims);
    tracing::debug!(user_id = %auth_user.id, role = %auth_user.role, "Authenticated");
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}
