// SPDX-License-Identifier: MIT
// Copyright 2026 complejos-backend contributors

//! Event routes: admin management and participant subscription.

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Extension, Router,
};
use mongodb::bson::{doc, Bson};
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::db::{DbError, UpdatePatch, ID_FIELD};
use crate::error::{AppError, Result};
use crate::middleware::auth::{AuthUser, ROLE_ADMIN};
use crate::models::event::PARTICIPANTS_FIELD;
use crate::models::{Event, EventDocument, NewEvent};
use crate::routes::envelope::{parse_json, ApiResponse, RawBody};
use crate::routes::patch::admin_patch;
use crate::AppState;

/// Routes open to anonymous callers.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/event", get(list_events))
        .route("/event/{id}", get(get_event))
        // The static update path shadows `{id}`; on GET it is still an id.
        .route(
            "/event/admin",
            get(|state: State<Arc<AppState>>| get_event(state, Path("admin".to_string()))),
        )
}

/// Routes requiring a token (auth layer applied in routes/mod.rs).
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/event", post(create_event))
        .route("/event/admin", put(update_event_as_admin))
        .route("/event/{id}/subscribe", put(subscribe))
        .route("/event/{id}/unsubscribe", put(unsubscribe))
}

async fn create_event(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    RawBody(body): RawBody,
) -> Result<ApiResponse<Event>> {
    user.require_role(ROLE_ADMIN, "You do not have permission to create events.")?;

    let new: NewEvent = parse_json(&body)?;
    new.validate()?;

    let event = Event::create(Uuid::new_v4().to_string(), new);

    state
        .events
        .insert(&EventDocument::from(&event))
        .await
        .map_err(|e| AppError::database("Failed to create event", e))?;

    tracing::info!(event_id = %event.id, admin_id = %user.id, "Event created");
    Ok(ApiResponse::created("Event created successfully").with_data(event))
}

/// List every Event. An empty collection answers 404.
async fn list_events(State(state): State<Arc<AppState>>) -> Result<ApiResponse<Vec<Event>>> {
    let events: Vec<Event> = state
        .events
        .find_all::<EventDocument>()
        .await
        .map_err(|e| AppError::database("Failed to fetch Event from the database", e))?
        .into_iter()
        .map(Event::from)
        .collect();

    if events.is_empty() {
        return Err(AppError::NotFound("No Event found in the database".to_string()));
    }

    Ok(ApiResponse::ok("Event retrieved successfully").with_data(events))
}

async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Event>> {
    let document: EventDocument = state.events.find_one(&id).await.map_err(|e| match e {
        DbError::NotFound => AppError::NotFound("Event not found".to_string()),
        other => AppError::database("Failed to retrieve Event", other),
    })?;

    Ok(ApiResponse::ok("Event retrieved successfully").with_data(Event::from(document)))
}

/// An "admin" sets arbitrary fields on the Event named by `_id` in the body.
async fn update_event_as_admin(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    RawBody(body): RawBody,
) -> Result<ApiResponse<()>> {
    user.require_role(ROLE_ADMIN, "You do not have permission to update this Event.")?;

    let fields: Map<String, Value> = parse_json(&body)?;
    let (target, patch) = admin_patch(fields)?;
    let target = target.unwrap_or_else(|| user.id.clone());

    let outcome = state
        .events
        .update_one(doc! { ID_FIELD: target.as_str() }, UpdatePatch::Set(patch))
        .await
        .map_err(|e| AppError::database("Failed to update Event", e))?;

    if outcome.matched == 0 {
        return Err(AppError::NotFound("Event not found".to_string()));
    }

    tracing::info!(event_id = %target, admin_id = %user.id, "Event updated by admin");
    Ok(ApiResponse::ok("Event updated successfully"))
}

/// Add the caller's username to the participants set.
async fn subscribe(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>> {
    let patch = UpdatePatch::AddToSet {
        field: PARTICIPANTS_FIELD.to_string(),
        value: Bson::String(user.username.clone()),
    };

    let outcome = state
        .events
        .update_one(doc! { ID_FIELD: id.as_str() }, patch)
        .await
        .map_err(|e| AppError::database("Failed to subscribe to the event", e))?;

    if outcome.matched == 0 {
        return Err(AppError::NotFound("Event not found".to_string()));
    }
    if outcome.modified == 0 {
        return Err(AppError::Conflict(
            "Complejo is already subscribed to the event.".to_string(),
        ));
    }

    tracing::info!(event_id = %id, username = %user.username, "Subscribed to event");
    Ok(ApiResponse::ok("Successfully subscribed to the event"))
}

/// Remove the caller's username from the participants set.
async fn unsubscribe(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>> {
    let patch = UpdatePatch::Pull {
        field: PARTICIPANTS_FIELD.to_string(),
        value: Bson::String(user.username.clone()),
    };

    let outcome = state
        .events
        .update_one(doc! { ID_FIELD: id.as_str() }, patch)
        .await
        .map_err(|e| AppError::database("Failed to unsubscribe from event", e))?;

    if outcome.matched == 0 {
        return Err(AppError::NotFound("Event not found".to_string()));
    }
    if outcome.modified == 0 {
        return Err(AppError::Conflict(
            "Complejo is not already subscribed to the event.".to_string(),
        ));
    }

    tracing::info!(event_id = %id, username = %user.username, "Unsubscribed from event");
    Ok(ApiResponse::ok("Successfully unsubscribed from event"))
}
