// SPDX-License-Identifier: MIT
// Copyright 2026 complejos-backend contributors

//! Building `$set` documents from client-supplied field maps.

use mongodb::bson::{self, Document};
use serde_json::{Map, Value};

use crate::db::ID_FIELD;
use crate::error::AppError;

/// Fields a "user" may change on their own profile.
pub const USER_UPDATABLE_FIELDS: [&str; 7] = [
    "username", "weight", "height", "bench", "squad", "deadlift", "photo",
];

/// Keep only allow-listed fields; anything else is dropped silently.
///
/// Numbers are stored as decimal strings like the rest of the profile.
pub fn user_patch(mut fields: Map<String, Value>) -> Result<Document, AppError> {
    let mut patch = Document::new();
    for field in USER_UPDATABLE_FIELDS {
        if let Some(value) = fields.remove(field) {
            let value = match value {
                Value::Number(n) => Value::String(n.to_string()),
                other => other,
            };
            patch.insert(field, to_bson(&value)?);
        }
    }

    if patch.is_empty() {
        return Err(AppError::BadRequest("No valid fields to update".to_string()));
    }
    Ok(patch)
}

/// Admin update: any field except the primary key.
///
/// A string `_id` in the body names the target record and is removed from
/// the patch; the returned target is `None` when no such id was given.
pub fn admin_patch(mut fields: Map<String, Value>) -> Result<(Option<String>, Document), AppError> {
    let target = match fields.remove(ID_FIELD) {
        Some(Value::String(id)) if !id.is_empty() => Some(id),
        _ => None,
    };

    let mut patch = Document::new();
    for (field, value) in fields {
        patch.insert(field, to_bson(&value)?);
    }

    if patch.is_empty() {
        return Err(AppError::BadRequest("No fields to update".to_string()));
    }
    Ok((target, patch))
}

fn to_bson(value: &Value) -> Result<bson::Bson, AppError> {
    bson::to_bson(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode update: {}", e)))
}
