//! Entry, EntryChange and EntryRef types.
//!
//! An `Entry` is a plain value: the store keeps the live copies, and every
//! transaction in the log embeds its own snapshot.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single stored secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Opaque, globally unique identifier assigned by the caller.
    pub id: String,

    /// Display label (e.g. "email").
    pub title: String,

    /// The protected value.
    pub secret: String,

    /// When this entry was first created.
    pub created_at: DateTime<Utc>,

    /// When this entry was last changed.
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    /// Build an entry with both timestamps set to now.
    pub fn new(id: impl Into<String>, title: impl Into<String>, secret: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.into(),
            secret: secret.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Build an entry with a fresh random UUID v4 as its id.
    pub fn generate(title: impl Into<String>, secret: impl Into<String>) -> Self {
        Self::new(Uuid::new_v4().to_string(), title, secret)
    }
}

/// A partial update: only the fields that are `Some` are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryChange {
    pub title: Option<String>,
    pub secret: Option<String>,
}

impl EntryChange {
    /// Returns `true` if no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.secret.is_none()
    }

    /// Apply the provided fields to `entry` and stamp `updated_at`.
    pub(crate) fn apply(&self, entry: &mut Entry, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            entry.title.clone_from(title);
        }
        if let Some(secret) = &self.secret {
            entry.secret.clone_from(secret);
        }
        entry.updated_at = now;
    }
}

/// How a caller addresses an entry in the current view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryRef {
    /// By its identifier.
    Id(String),
    /// By its 0-based index in the current list.  Not stable across
    /// mutations.
    Position(usize),
}

impl fmt::Display for EntryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => f.write_str(id),
            Self::Position(pos) => write!(f, "#{}", pos + 1),
        }
    }
}
