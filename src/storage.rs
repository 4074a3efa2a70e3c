//! Storage - the saved event (name + target date) in `localStorage`
//!
//! Record format: `{"name": "...", "date": "2026-12-24T23:00:00.000Z" | null}`.
//! Failures never reach the caller; they are logged and treated as empty.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};
use wasm_bindgen::JsValue;

use crate::config::STORAGE_KEY;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("localStorage is not available")]
    Unavailable,
    #[error("localStorage access failed: {0}")]
    Access(String),
    #[error("malformed event record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid event date {value:?}: {source}")]
    Date {
        value: String,
        source: chrono::ParseError,
    },
}

impl From<JsValue> for StorageError {
    fn from(err: JsValue) -> Self {
        Self::Access(format!("{err:?}"))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredEvent {
    #[serde(default)]
    name: String,
    #[serde(default)]
    date: Option<String>,
}

/// Event restored from storage
#[derive(Debug, Clone, PartialEq)]
pub struct SavedEvent {
    pub name: String,
    pub date: Option<DateTime<Utc>>,
}

pub fn encode_event(name: &str, date: Option<&DateTime<Utc>>) -> Result<String, StorageError> {
    let record = StoredEvent {
        name: name.to_string(),
        date: date.map(|d| d.to_rfc3339_opts(SecondsFormat::Millis, true)),
    };
    Ok(serde_json::to_string(&record)?)
}

pub fn decode_event(raw: &str) -> Result<SavedEvent, StorageError> {
    let record: StoredEvent = serde_json::from_str(raw)?;
    let date = match record.date {
        Some(value) => match DateTime::parse_from_rfc3339(&value) {
            Ok(date) => Some(date.with_timezone(&Utc)),
            Err(source) => return Err(StorageError::Date { value, source }),
        },
        None => None,
    };
    Ok(SavedEvent { name: record.name, date })
}

/// A record is kept while either field holds something; an empty form clears it
pub fn should_persist(name: &str, date: Option<&DateTime<Utc>>) -> bool {
    !name.is_empty() || date.is_some()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventStore {
    key: &'static str,
}

impl Default for EventStore {
    fn default() -> Self {
        Self { key: STORAGE_KEY }
    }
}

impl EventStore {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window().ok_or(StorageError::Unavailable)?;
        window.local_storage()?.ok_or(StorageError::Unavailable)
    }

    pub fn load(&self) -> Option<SavedEvent> {
        match self.try_load() {
            Ok(event) => event,
            Err(err) => {
                error!(%err, "failed to load event from localStorage");
                None
            }
        }
    }

    fn try_load(&self) -> Result<Option<SavedEvent>, StorageError> {
        let Some(raw) = Self::storage()?.get_item(self.key)? else {
            return Ok(None);
        };
        let event = decode_event(&raw)?;
        info!(name = %event.name, date = ?event.date, "restored saved event");
        Ok(Some(event))
    }

    pub fn save(&self, name: &str, date: Option<&DateTime<Utc>>) {
        let result = encode_event(name, date)
            .and_then(|raw| Ok(Self::storage()?.set_item(self.key, &raw)?));
        if let Err(err) = result {
            error!(%err, "failed to save event to localStorage");
        }
    }

    /// Save the current form, or clear the record when the form is empty
    pub fn sync(&self, name: &str, date: Option<&DateTime<Utc>>) {
        if should_persist(name, date) {
            self.save(name, date);
        } else {
            self.clear();
        }
    }

    pub fn clear(&self) {
        let result = Self::storage().and_then(|s| Ok(s.remove_item(self.key)?));
        if let Err(err) = result {
            error!(%err, "failed to clear event from localStorage");
        }
    }
}
