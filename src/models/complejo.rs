// SPDX-License-Identifier: MIT
// Copyright 2026 complejos-backend contributors

//! Complejo (user profile) model for storage and API.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::imc;

/// User profile stored in the `complejo` collection.
///
/// Fitness metrics are kept as the decimal strings the client sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Complejo {
    /// UUID v4 (also used as document ID)
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    /// Stored and compared verbatim. Passwords are NOT hashed; this is a
    /// known defect pending a credential migration.
    pub password: String,
    /// "user" or "admin"; not otherwise constrained
    pub role: String,
    /// Weight in kilograms
    #[serde(default)]
    pub weight: String,
    /// Height in meters
    #[serde(default)]
    pub height: String,
    /// IMC category label, computed at creation only
    #[serde(default)]
    pub imc: String,
    pub gender: String,
    #[serde(default)]
    pub bench: String,
    #[serde(default)]
    pub squad: String,
    #[serde(default)]
    pub dl: String,
    /// Base64-encoded profile photo
    #[serde(default)]
    pub photo: String,
}

/// Request body for creating a Complejo.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewComplejo {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[validate(length(min = 1, message = "role is required"))]
    pub role: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub height: String,
    #[validate(length(min = 1, message = "gender is required"))]
    pub gender: String,
    #[serde(default)]
    pub bench: String,
    #[serde(default)]
    pub squad: String,
    #[serde(default)]
    pub dl: String,
    #[serde(default)]
    pub photo: String,
}

impl Complejo {
    /// Build a stored record from a request, assigning `id` and classifying IMC.
    pub fn create(id: String, new: NewComplejo) -> Self {
        let imc = imc::classify(&new.weight, &new.height).to_string();
        Self {
            id,
            username: new.username,
            password: new.password,
            role: new.role,
            weight: new.weight,
            height: new.height,
            imc,
            gender: new.gender,
            bench: new.bench,
            squad: new.squad,
            dl: new.dl,
            photo: new.photo,
        }
    }
}
