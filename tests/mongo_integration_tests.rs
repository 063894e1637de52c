// SPDX-License-Identifier: MIT
// Copyright 2026 complejos-backend contributors

//! Integration tests against a live MongoDB.
//!
//! These tests require a reachable server.
//! Run with: MONGO_TEST_URI=mongodb://localhost:27017 cargo test --test mongo_integration_tests

use complejos_backend::db::{collections, DbError, DocumentDb, UpdateOutcome, UpdatePatch};
use complejos_backend::models::{Complejo, Event, EventDocument, NewComplejo, NewEvent};
use mongodb::bson::{doc, Bson, Document};

/// Connection string of the test server, if any.
fn mongo_uri() -> Option<String> {
    std::env::var("MONGO_TEST_URI").ok().filter(|uri| !uri.is_empty())
}

/// Skip test with message if no server is configured.
macro_rules! require_mongo {
    () => {
        match mongo_uri() {
            Some(uri) => uri,
            None => {
                eprintln!("⚠️  Skipping: MONGO_TEST_URI not set");
                return;
            }
        }
    };
}

/// Connect to a database unique to this test run.
async fn test_db(uri: &str) -> DocumentDb {
    let name = format!("complejos_test_{}", uuid::Uuid::new_v4().simple());
    DocumentDb::connect(uri, &name).await.unwrap()
}

fn new_complejo(username: &str) -> Complejo {
    Complejo::create(
        uuid::Uuid::new_v4().to_string(),
        NewComplejo {
            username: username.to_string(),
            password: "hunter2".to_string(),
            role: "user".to_string(),
            weight: "70".to_string(),
            height: "1.8".to_string(),
            gender: "male".to_string(),
            bench: String::new(),
            squad: String::new(),
            dl: String::new(),
            photo: String::new(),
        },
    )
}

fn new_event(title: &str) -> Event {
    Event::create(
        uuid::Uuid::new_v4().to_string(),
        NewEvent {
            title: title.to_string(),
            description: "A gathering of fitness enthusiasts.".to_string(),
            participants: Vec::new(),
            date: "2025-02-01T10:00:00Z".parse().unwrap(),
            image: None,
            location: "Local Gym, Main Street".to_string(),
        },
    )
}

#[tokio::test]
async fn test_complejo_insert_find_update() {
    let uri = require_mongo!();
    let db = test_db(&uri).await;
    let complejos = db.collection(collections::COMPLEJO);

    let complejo = new_complejo("ana");
    complejos.insert(&complejo).await.unwrap();

    let found: Complejo = complejos.find_one(&complejo.id).await.unwrap();
    assert_eq!(found, complejo);

    let outcome = complejos
        .update_one(
            doc! { "_id": complejo.id.as_str(), "role": "admin" },
            UpdatePatch::Set(doc! { "weight": "80" }),
        )
        .await
        .unwrap();
    assert_eq!(outcome.matched, 0);

    let outcome = complejos
        .update_one(
            doc! { "_id": complejo.id.as_str(), "role": "user" },
            UpdatePatch::Set(doc! { "weight": "80" }),
        )
        .await
        .unwrap();
    assert_eq!(outcome, UpdateOutcome { matched: 1, modified: 1 });

    let found: Complejo = complejos.find_one(&complejo.id).await.unwrap();
    assert_eq!(found.weight, "80");
    assert_eq!(found.imc, "NPC");

    let missing = complejos.find_one::<Complejo>("missing").await;
    assert!(matches!(missing, Err(DbError::NotFound)));

    let all: Vec<Complejo> = complejos.find_all().await.unwrap();
    assert_eq!(all.len(), 1);

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_event_participants_set_semantics() {
    let uri = require_mongo!();
    let db = test_db(&uri).await;
    let events = db.collection(collections::EVENT);

    let event = new_event("Meetup");
    events.insert(&EventDocument::from(&event)).await.unwrap();
    let filter = doc! { "_id": event.id.as_str() };

    let add = UpdatePatch::AddToSet {
        field: "participants".to_string(),
        value: Bson::String("ana".to_string()),
    };
    let first = events.update_one(filter.clone(), add.clone()).await.unwrap();
    assert_eq!(first, UpdateOutcome { matched: 1, modified: 1 });
    let second = events.update_one(filter.clone(), add).await.unwrap();
    assert_eq!(second, UpdateOutcome { matched: 1, modified: 0 });

    let pull = UpdatePatch::Pull {
        field: "participants".to_string(),
        value: Bson::String("ana".to_string()),
    };
    let removed = events.update_one(filter.clone(), pull.clone()).await.unwrap();
    assert_eq!(removed.modified, 1);
    let again = events.update_one(filter.clone(), pull).await.unwrap();
    assert_eq!(again, UpdateOutcome { matched: 1, modified: 0 });

    let stored: EventDocument = events.find_one(&event.id).await.unwrap();
    assert!(stored.participants.is_empty());
    assert_eq!(stored.date, event.date);

    let raw: Document = events.find_one(&event.id).await.unwrap();
    assert!(raw.get_datetime("date").is_ok(), "date must be a BSON datetime");

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_event_with_native_date_and_null_participants() {
    let uri = require_mongo!();
    let db = test_db(&uri).await;
    let events = db.collection(collections::EVENT);

    // Shape written when a create omitted the participant list
    let date: chrono::DateTime<chrono::Utc> = "2025-02-01T10:00:00Z".parse().unwrap();
    let raw = doc! {
        "_id": "legacy-event",
        "title": "Gym Meetup",
        "description": "A gathering of fitness enthusiasts.",
        "participants": Bson::Null,
        "date": mongodb::bson::DateTime::from_millis(date.timestamp_millis()),
        "image": "",
        "location": "Local Gym, Main Street",
    };
    events.insert(&raw).await.unwrap();

    let event: Event = events
        .find_one::<EventDocument>("legacy-event")
        .await
        .unwrap()
        .into();
    assert_eq!(event.date, date);
    assert!(event.participants.is_empty());

    let all: Vec<EventDocument> = events.find_all().await.unwrap();
    assert_eq!(all.len(), 1);

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_connect_to_unreachable_server_fails() {
    let _ = require_mongo!();
    let result = DocumentDb::connect("mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=500", "x").await;
    assert!(matches!(result, Err(DbError::Connection(_))));
}
