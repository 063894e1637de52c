// SPDX-License-Identifier: MIT
// Copyright 2026 complejos-backend contributors

//! Persistence gateway over a document store.
//!
//! [`DocumentDb`] owns the connection, [`DocumentCollection`] exposes the four
//! per-collection operations the handlers need. Two backends share the same
//! update semantics: MongoDB for deployments and an in-process store used by
//! tests and local runs.

pub mod memory;
pub mod mongo;

use mongodb::bson::{self, doc, Bson, Document};
use serde::{de::DeserializeOwned, Serialize};

pub use memory::{MemoryCollection, MemoryStore};

/// Collection names as constants.
pub mod collections {
    pub const COMPLEJO: &str = "complejo";
    pub const EVENT: &str = "event";
}

/// Primary key field of every stored document.
pub const ID_FIELD: &str = "_id";

/// Persistence errors.
///
/// `NotFound` is distinct from transport and query failures so callers can
/// answer 404 instead of 500.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("document not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("decode error: {0}")]
    Decode(String),
}

impl From<mongodb::error::Error> for DbError {
    fn from(err: mongodb::error::Error) -> Self {
        DbError::Query(err.to_string())
    }
}

/// A single-document modification, applied atomically by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdatePatch {
    /// `$set`: overwrite the given top-level fields
    Set(Document),
    /// `$addToSet`: insert `value` into the array at `field` unless present
    AddToSet { field: String, value: Bson },
    /// `$pull`: remove every occurrence of `value` from the array at `field`
    Pull { field: String, value: Bson },
}

impl UpdatePatch {
    /// Update document in MongoDB operator syntax.
    pub fn to_document(&self) -> Document {
        match self {
            UpdatePatch::Set(fields) => doc! { "$set": fields.clone() },
            UpdatePatch::AddToSet { field, value } => {
                doc! { "$addToSet": { field.as_str(): value.clone() } }
            }
            UpdatePatch::Pull { field, value } => {
                doc! { "$pull": { field.as_str(): value.clone() } }
            }
        }
    }
}

/// Result of an `update_one`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Documents matching the filter (0 or 1)
    pub matched: u64,
    /// Documents actually changed (0 when the patch was a no-op)
    pub modified: u64,
}

/// Shared database handle, created once at startup and cloned into state.
#[derive(Clone)]
pub struct DocumentDb {
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    Mongo(mongo::MongoBackend),
    Memory(MemoryStore),
}

impl DocumentDb {
    /// Connect to MongoDB and verify the server answers a ping.
    ///
    /// Fails if the server is unreachable within the connect timeout.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, DbError> {
        let backend = mongo::MongoBackend::connect(uri, database).await?;
        Ok(Self {
            backend: Backend::Mongo(backend),
        })
    }

    /// Create a process-local database (tests and local development).
    pub fn in_memory() -> Self {
        tracing::info!("Using in-memory document store");
        Self {
            backend: Backend::Memory(MemoryStore::default()),
        }
    }

    /// Get a handle to a named collection.
    pub fn collection(&self, name: &str) -> DocumentCollection {
        let inner = match &self.backend {
            Backend::Mongo(mongo) => CollectionBackend::Mongo(mongo.collection(name)),
            Backend::Memory(store) => CollectionBackend::Memory(store.collection(name)),
        };
        DocumentCollection {
            name: name.to_string(),
            inner,
        }
    }

    /// Close the underlying connection.
    pub async fn close(self) -> Result<(), DbError> {
        match self.backend {
            Backend::Mongo(mongo) => mongo.close().await,
            Backend::Memory(_) => Ok(()),
        }
    }
}

/// Handle to one collection. Cheap to clone.
#[derive(Clone)]
pub struct DocumentCollection {
    name: String,
    inner: CollectionBackend,
}

#[derive(Clone)]
enum CollectionBackend {
    Mongo(mongodb::Collection<Document>),
    Memory(MemoryCollection),
}

impl DocumentCollection {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert a new record. The record must serialize with a string `_id`.
    pub async fn insert<T: Serialize>(&self, record: &T) -> Result<(), DbError> {
        let document = bson::to_document(record).map_err(|e| DbError::Encode(e.to_string()))?;
        match &self.inner {
            CollectionBackend::Mongo(collection) => {
                collection.insert_one(document).await?;
                Ok(())
            }
            CollectionBackend::Memory(collection) => collection.insert(document),
        }
    }

    /// Find a record by `_id`, returning [`DbError::NotFound`] if absent.
    pub async fn find_one<T: DeserializeOwned>(&self, id: &str) -> Result<T, DbError> {
        let document = match &self.inner {
            CollectionBackend::Mongo(collection) => {
                collection.find_one(doc! { ID_FIELD: id }).await?
            }
            CollectionBackend::Memory(collection) => collection.get(id),
        };

        document.ok_or(DbError::NotFound).and_then(decode)
    }

    /// Fetch every record in the collection.
    pub async fn find_all<T: DeserializeOwned>(&self) -> Result<Vec<T>, DbError> {
        let documents = match &self.inner {
            CollectionBackend::Mongo(collection) => mongo::find_all(collection).await?,
            CollectionBackend::Memory(collection) => collection.all(),
        };

        documents.into_iter().map(decode).collect()
    }

    /// Apply `patch` to the first document matching every field of `filter`.
    pub async fn update_one(
        &self,
        filter: Document,
        patch: UpdatePatch,
    ) -> Result<UpdateOutcome, DbError> {
        let outcome = match &self.inner {
            CollectionBackend::Mongo(collection) => {
                let result = collection.update_one(filter, patch.to_document()).await?;
                UpdateOutcome {
                    matched: result.matched_count,
                    modified: result.modified_count,
                }
            }
            CollectionBackend::Memory(collection) => collection.update_one(&filter, &patch)?,
        };

        tracing::debug!(
            collection = %self.name,
            matched = outcome.matched,
            modified = outcome.modified,
            "update_one"
        );
        Ok(outcome)
    }
}

fn decode<T: DeserializeOwned>(document: Document) -> Result<T, DbError> {
    bson::from_document(document).map_err(|e| DbError::Decode(e.to_string()))
}
