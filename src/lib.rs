// SPDX-License-Identifier: MIT
// Copyright 2026 complejos-backend contributors

//! Los Complejos backend
//!
//! REST API for user profiles ("Complejos") with fitness metrics and the
//! events they subscribe to, stored in a document database and guarded by
//! role-carrying JWTs.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::{collections, DocumentCollection, DocumentDb};
use services::TokenService;

/// Shared application state.
///
/// Built once at startup from an already-connected [`DocumentDb`].
pub struct AppState {
    pub config: Config,
    pub db: DocumentDb,
    pub complejos: DocumentCollection,
    pub events: DocumentCollection,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(config: Config, db: DocumentDb) -> Self {
        let tokens = TokenService::new(&config.jwt_secret);
        Self {
            complejos: db.collection(collections::COMPLEJO),
            events: db.collection(collections::EVENT),
            db,
            tokens,
            config,
        }
    }
}
