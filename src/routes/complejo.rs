// SPDX-License-Identifier: MIT
// Copyright 2026 complejos-backend contributors

//! Complejo (user profile) routes.

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Extension, Router,
};
use mongodb::bson::doc;
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::db::{DbError, UpdatePatch, ID_FIELD};
use crate::error::{AppError, Result};
use crate::middleware::auth::{AuthUser, ROLE_ADMIN, ROLE_USER};
use crate::models::{Complejo, NewComplejo};
use crate::routes::envelope::{parse_json, ApiResponse, JsonBody, RawBody};
use crate::routes::patch::{admin_patch, user_patch};
use crate::AppState;

const UPDATE_FORBIDDEN: &str = "You do not have permission to update this Complejo.";

/// Routes open to anonymous callers.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/complejo", post(create_complejo).get(list_complejos))
        .route("/complejo/{id}", get(get_complejo))
        // The static update paths shadow `{id}`; on GET they are still ids.
        .route(
            "/complejo/admin",
            get(|state: State<Arc<AppState>>| get_complejo(state, Path("admin".to_string()))),
        )
        .route(
            "/complejo/user",
            get(|state: State<Arc<AppState>>| get_complejo(state, Path("user".to_string()))),
        )
}

/// Routes requiring a token (auth layer applied in routes/mod.rs).
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/complejo/admin", put(update_complejo_as_admin))
        .route("/complejo/user", put(update_complejo_as_user))
}

/// Register a new Complejo and hand back a token for it.
///
/// No uniqueness check on `username`: two creates with the same name both
/// succeed.
async fn create_complejo(
    State(state): State<Arc<AppState>>,
    JsonBody(new): JsonBody<NewComplejo>,
) -> Result<ApiResponse<Complejo>> {
    new.validate()?;

    let complejo = Complejo::create(Uuid::new_v4().to_string(), new);

    state
        .complejos
        .insert(&complejo)
        .await
        .map_err(|e| AppError::database("Failed to create Complejo", e))?;

    let token = state
        .tokens
        .issue(&complejo.id, &complejo.role, &complejo.username)
        .map_err(|e| AppError::Internal(e.into()))?;

    tracing::info!(
        complejo_id = %complejo.id,
        username = %complejo.username,
        role = %complejo.role,
        imc = %complejo.imc,
        "Complejo created"
    );

    Ok(ApiResponse::created("Complejo created successfully")
        .with_data(complejo)
        .with_token(token))
}

/// List every Complejo. An empty collection answers 404.
async fn list_complejos(State(state): State<Arc<AppState>>) -> Result<ApiResponse<Vec<Complejo>>> {
    let complejos: Vec<Complejo> = state
        .complejos
        .find_all()
        .await
        .map_err(|e| AppError::database("Failed to fetch Complejos from the database", e))?;

    if complejos.is_empty() {
        return Err(AppError::NotFound(
            "No Complejos found in the database".to_string(),
        ));
    }

    Ok(ApiResponse::ok("Complejos retrieved successfully").with_data(complejos))
}

async fn get_complejo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Complejo>> {
    let complejo = state.complejos.find_one(&id).await.map_err(|e| match e {
        DbError::NotFound => AppError::NotFound("Complejo not found".to_string()),
        other => AppError::database("Failed to retrieve Complejo", other),
    })?;

    Ok(ApiResponse::ok("Complejo retrieved successfully").with_data(complejo))
}

/// A "user" updates allow-listed fields of their own profile.
///
/// IMC is not recomputed here, so it can go stale after a weight or height
/// change.
async fn update_complejo_as_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    RawBody(body): RawBody,
) -> Result<ApiResponse<()>> {
    user.require_role(ROLE_USER, UPDATE_FORBIDDEN)?;

    let fields: Map<String, Value> = parse_json(&body)?;
    let patch = user_patch(fields)?;

    let outcome = state
        .complejos
        .update_one(
            doc! { ID_FIELD: user.id.as_str(), "role": ROLE_USER },
            UpdatePatch::Set(patch),
        )
        .await
        .map_err(|e| AppError::database("Failed to update Complejo", e))?;

    if outcome.matched == 0 {
        return Err(AppError::NotFound(
            "Complejo not found or insufficient permissions".to_string(),
        ));
    }

    tracing::info!(complejo_id = %user.id, "Complejo updated by owner");
    Ok(ApiResponse::ok("Complejo updated successfully"))
}

/// An "admin" sets arbitrary fields on a Complejo.
///
/// The `_id` in the body selects the record (defaulting to the caller's own)
/// and is never written.
async fn update_complejo_as_admin(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    RawBody(body): RawBody,
) -> Result<ApiResponse<()>> {
    user.require_role(ROLE_ADMIN, UPDATE_FORBIDDEN)?;

    let fields: Map<String, Value> = parse_json(&body)?;
    let (target, patch) = admin_patch(fields)?;
    let target = target.unwrap_or_else(|| user.id.clone());

    let outcome = state
        .complejos
        .update_one(doc! { ID_FIELD: target.as_str() }, UpdatePatch::Set(patch))
        .await
        .map_err(|e| AppError::database("Failed to update Complejo", e))?;

    if outcome.matched == 0 {
        return Err(AppError::NotFound("Complejo not found".to_string()));
    }

    tracing::info!(complejo_id = %target, admin_id = %user.id, "Complejo updated by admin");
    Ok(ApiResponse::ok("Complejo updated successfully"))
}
