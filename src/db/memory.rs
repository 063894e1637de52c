// SPDX-License-Identifier: MIT
// Copyright 2026 complejos-backend contributors

//! In-process document store.
//!
//! Mirrors the subset of MongoDB semantics the gateway relies on: string
//! `_id` primary keys, top-level equality filters and the `$set`,
//! `$addToSet` and `$pull` update operators, each applied atomically to a
//! single document.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use mongodb::bson::{Bson, Document};

use crate::db::{DbError, UpdateOutcome, UpdatePatch, ID_FIELD};

/// All collections of an in-memory database.
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<DashMap<String, MemoryCollection>>,
}

impl MemoryStore {
    pub fn collection(&self, name: &str) -> MemoryCollection {
        self.collections
            .entry(name.to_string())
            .or_default()
            .value()
            .clone()
    }
}

/// Documents of one collection keyed by `_id`.
#[derive(Clone, Default)]
pub struct MemoryCollection {
    documents: Arc<DashMap<String, Document>>,
}

impl MemoryCollection {
    pub fn insert(&self, document: Document) -> Result<(), DbError> {
        let id = match document.get(ID_FIELD) {
            Some(Bson::String(id)) => id.clone(),
            _ => {
                return Err(DbError::Encode(
                    "document requires a string _id".to_string(),
                ))
            }
        };

        match self.documents.entry(id) {
            Entry::Occupied(entry) => Err(DbError::Query(format!(
                "E11000 duplicate key error: _id {:?}",
                entry.key()
            ))),
            Entry::Vacant(entry) => {
                entry.insert(document);
                Ok(())
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<Document> {
        self.documents.get(id).map(|doc| doc.value().clone())
    }

    pub fn all(&self) -> Vec<Document> {
        self.documents.iter().map(|doc| doc.value().clone()).collect()
    }

    pub fn update_one(
        &self,
        filter: &Document,
        patch: &UpdatePatch,
    ) -> Result<UpdateOutcome, DbError> {
        // Resolve the key first so the write lock covers only one document.
        let key = match filter.get(ID_FIELD) {
            Some(Bson::String(id)) => Some(id.clone()),
            Some(_) => None,
            None => self
                .documents
                .iter()
                .find(|doc| matches_filter(doc.value(), filter))
                .map(|doc| doc.key().clone()),
        };

        let Some(key) = key else {
            return Ok(UpdateOutcome::default());
        };
        let Some(mut document) = self.documents.get_mut(&key) else {
            return Ok(UpdateOutcome::default());
        };
        if !matches_filter(&document, filter) {
            return Ok(UpdateOutcome::default());
        }

        let modified = apply_patch(&mut document, patch)?;
        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(modified),
        })
    }
}

fn matches_filter(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(field, expected)| document.get(field) == Some(expected))
}

/// Apply `patch` in place, returning whether the document changed.
fn apply_patch(document: &mut Document, patch: &UpdatePatch) -> Result<bool, DbError> {
    match patch {
        UpdatePatch::Set(fields) => {
            if fields.is_empty() {
                return Err(DbError::Query(
                    "'$set' is empty. You must specify a field like so: {$set: {<field>: ...}}"
                        .to_string(),
                ));
            }
            if fields.contains_key(ID_FIELD) {
                return Err(DbError::Query(
                    "Performing an update on the path '_id' would modify the immutable field '_id'"
                        .to_string(),
                ));
            }

            let mut changed = false;
            for (field, value) in fields {
                if document.get(field) != Some(value) {
                    document.insert(field.clone(), value.clone());
                    changed = true;
                }
            }
            Ok(changed)
        }
        UpdatePatch::AddToSet { field, value } => match document.get_mut(field) {
            None => {
                document.insert(field.clone(), Bson::Array(vec![value.clone()]));
                Ok(true)
            }
            Some(Bson::Array(items)) => {
                if items.contains(value) {
                    Ok(false)
                } else {
                    items.push(value.clone());
                    Ok(true)
                }
            }
            Some(_) => Err(DbError::Query(format!(
                "Cannot apply $addToSet to non-array field '{}'",
                field
            ))),
        },
        UpdatePatch::Pull { field, value } => match document.get_mut(field) {
            None => Ok(false),
            Some(Bson::Array(items)) => {
                let before = items.len();
                items.retain(|item| item != value);
                Ok(items.len() != before)
            }
            Some(_) => Err(DbError::Query(format!(
                "Cannot apply $pull to a non-array value in field '{}'",
                field
            ))),
        },
    }
}
