// SPDX-License-Identifier: MIT
// Copyright 2026 complejos-backend contributors

//! Event model for storage and API.

use chrono::{DateTime, TimeZone, Utc};
use mongodb::bson::{self, Bson};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use validator::Validate;

/// Field holding the usernames subscribed to an event.
pub const PARTICIPANTS_FIELD: &str = "participants";

/// Event stored in the `event` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    /// UUID v4 (also used as document ID)
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    /// Subscribed usernames, kept free of duplicates by the store
    #[serde(default, deserialize_with = "null_as_empty")]
    pub participants: Vec<String>,
    pub date: DateTime<Utc>,
    /// Optional image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub location: String,
}

/// Request body for creating an Event.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewEvent {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub participants: Vec<String>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub image: Option<String>,
    #[validate(length(min = 1, message = "location is required"))]
    pub location: String,
}

impl Event {
    pub fn create(id: String, new: NewEvent) -> Self {
        let mut participants = Vec::with_capacity(new.participants.len());
        for username in new.participants {
            if !participants.contains(&username) {
                participants.push(username);
            }
        }

        Self {
            id,
            title: new.title,
            description: new.description,
            participants,
            date: new.date,
            image: new.image,
            location: new.location,
        }
    }
}

/// Event as stored in the `event` collection.
///
/// `date` is a BSON datetime on disk. Strings are accepted on read since an
/// admin update writes the RFC 3339 form the API uses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub participants: Vec<String>,
    #[serde(serialize_with = "date_to_bson", deserialize_with = "date_from_bson")]
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub location: String,
}

impl From<&Event> for EventDocument {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            title: event.title.clone(),
            description: event.description.clone(),
            participants: event.participants.clone(),
            date: event.date,
            image: event.image.clone(),
            location: event.location.clone(),
        }
    }
}

impl From<EventDocument> for Event {
    fn from(document: EventDocument) -> Self {
        Self {
            id: document.id,
            title: document.title,
            description: document.description,
            participants: document.participants,
            date: document.date,
            image: document.image,
            location: document.location,
        }
    }
}

/// A `null` participants list reads as empty.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn date_to_bson<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    bson::DateTime::from_millis(date.timestamp_millis()).serialize(serializer)
}

fn date_from_bson<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    match Bson::deserialize(deserializer)? {
        Bson::DateTime(date) => Utc
            .timestamp_millis_opt(date.timestamp_millis())
            .single()
            .ok_or_else(|| de::Error::custom("date is out of range")),
        Bson::String(text) => DateTime::parse_from_rfc3339(&text)
            .map(|date| date.with_timezone(&Utc))
            .map_err(de::Error::custom),
        other => Err(de::Error::custom(format!(
            "expected a date, found {:?}",
            other.element_type()
        ))),
    }
}
