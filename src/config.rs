// SPDX-License-Identifier: MIT
// Copyright 2026 complejos-backend contributors

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local development.

use std::env;

/// Default MongoDB connection string.
pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";
/// Default database holding the `complejo` and `event` collections.
pub const DEFAULT_DATABASE_NAME: &str = "COMPLEJOS";

/// Which persistence backend to start with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// MongoDB reached through `mongo_uri`
    Mongo,
    /// Process-local store, contents are lost on restart
    Memory,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Document store connection string
    pub mongo_uri: String,
    /// Database name
    pub database_name: String,
    /// Persistence backend
    pub storage: StorageBackend,
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// HS256 signing secret for identity tokens (raw bytes)
    pub jwt_secret: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }

        let storage = match env::var("STORAGE") {
            Ok(value) => parse_storage(&value)?,
            Err(_) => StorageBackend::Mongo,
        };

        Ok(Self {
            mongo_uri: env::var("MONGO_URI").unwrap_or_else(|_| DEFAULT_MONGO_URI.to_string()),
            database_name: env::var("DATABASE_NAME")
                .unwrap_or_else(|_| DEFAULT_DATABASE_NAME.to_string()),
            storage,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", "must be a number between 0-65535"))?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            jwt_secret: jwt_secret.into_bytes(),
        })
    }

    /// Fixed configuration for tests.
    pub fn test_default() -> Self {
        Self {
            mongo_uri: DEFAULT_MONGO_URI.to_string(),
            database_name: "COMPLEJOS_TEST".to_string(),
            storage: StorageBackend::Memory,
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            jwt_secret: b"test_jwt_secret_32_bytes_minimum!".to_vec(),
        }
    }

    /// Connection string with any credentials replaced, for logging.
    pub fn masked_mongo_uri(&self) -> String {
        mask_uri(&self.mongo_uri)
    }
}

fn parse_storage(value: &str) -> Result<StorageBackend, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "mongo" | "mongodb" => Ok(StorageBackend::Mongo),
        "memory" => Ok(StorageBackend::Memory),
        _ => Err(ConfigError::Invalid("STORAGE", "expected 'mongo' or 'memory'")),
    }
}

fn mask_uri(uri: &str) -> String {
    match (uri.find("://"), uri.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}***{}", &uri[..scheme_end + 3], &uri[at..])
        }
        _ => uri.to_string(),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, &'static str),
}
