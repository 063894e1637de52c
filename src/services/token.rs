// SPDX-License-Identifier: MIT
// Copyright 2026 complejos-backend contributors

//! Identity token issuing and validation (HS256 JWT).
//!
//! Tokens carry exactly three claims (`_id`, `username`, `role`) and no
//! expiry: they stay valid until the signing secret changes.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Verified identity claims.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub role: String,
}

/// Claims as found in a token, before presence checks.
#[derive(Deserialize)]
struct RawClaims {
    #[serde(rename = "_id")]
    id: Option<Value>,
    username: Option<Value>,
    role: Option<Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Failed to generate token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// Bad signature, wrong algorithm or structurally malformed token.
    #[error("Invalid or expired token")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    /// Signature is fine but a required claim is absent, empty or not a string.
    #[error("{0} is missing or invalid in the token")]
    MissingClaim(&'static str),
}

/// Signs and verifies identity tokens with a symmetric secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &[u8]) -> Self {
        // Only HS256 is accepted; no exp/nbf claims are issued or required.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token for the given identity.
    pub fn issue(&self, id: &str, role: &str, username: &str) -> Result<String, TokenError> {
        let claims = Claims {
            id: id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Verify signature and algorithm, then require every claim.
    ///
    /// Claims are inspected only once the token itself checks out.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let raw = decode::<RawClaims>(token, &self.decoding_key, &self.validation)
            .map_err(TokenError::Invalid)?
            .claims;

        let role = required_claim(raw.role, "Role")?;
        let username = required_claim(raw.username, "Username")?;
        let id = required_claim(raw.id, "User ID")?;

        Ok(Claims { id, username, role })
    }
}

fn required_claim(value: Option<Value>, name: &'static str) -> Result<String, TokenError> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Ok(s),
        _ => Err(TokenError::MissingClaim(name)),
    }
}
