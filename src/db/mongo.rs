// SPDX-License-Identifier: MIT
// Copyright 2026 complejos-backend contributors

//! MongoDB backend.

use std::future::IntoFuture;
use std::time::Duration;

use futures_util::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};

use crate::db::DbError;

/// Bound on establishing the connection and the startup ping.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Bound on shutting the client down.
const DISCONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub(crate) struct MongoBackend {
    client: Client,
    database: Database,
}

impl MongoBackend {
    pub(crate) async fn connect(uri: &str, database_name: &str) -> Result<Self, DbError> {
        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(|e| DbError::Connection(format!("Invalid MongoDB URI: {}", e)))?;
        options.connect_timeout = Some(CONNECT_TIMEOUT);
        options.server_selection_timeout = Some(CONNECT_TIMEOUT);
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

        let client =
            Client::with_options(options).map_err(|e| DbError::Connection(e.to_string()))?;
        let database = client.database(database_name);

        // The driver connects lazily; ping to fail fast when unreachable.
        tokio::time::timeout(
            CONNECT_TIMEOUT,
            database.run_command(doc! { "ping": 1 }).into_future(),
        )
        .await
        .map_err(|_| {
            DbError::Connection(format!(
                "MongoDB did not answer within {}s",
                CONNECT_TIMEOUT.as_secs()
            ))
        })?
        .map_err(|e| DbError::Connection(e.to_string()))?;

        tracing::info!(database = database_name, "Connected to MongoDB");

        Ok(Self { client, database })
    }

    pub(crate) fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection::<Document>(name)
    }

    pub(crate) async fn close(self) -> Result<(), DbError> {
        tokio::time::timeout(DISCONNECT_TIMEOUT, self.client.shutdown().into_future())
            .await
            .map_err(|_| {
                DbError::Connection(format!(
                    "MongoDB shutdown did not finish within {}s",
                    DISCONNECT_TIMEOUT.as_secs()
                ))
            })?;
        tracing::info!("MongoDB connection closed");
        Ok(())
    }
}

pub(crate) async fn find_all(collection: &Collection<Document>) -> Result<Vec<Document>, DbError> {
    let cursor = collection.find(doc! {}).await?;
    Ok(cursor.try_collect().await?)
}
