//! Core data model.
//!
//! A work item is one row to insert: a caller-assigned unique id plus a
//! short text payload. Items are built once, handed to exactly one worker,
//! and never mutated.

use serde::{Deserialize, Serialize};

/// One unit of work: a single row destined for the `items` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkItem {
    /// Unique caller-assigned identifier, 1..N for a batch of N.
    pub id: i32,

    pub title: String,

    pub description: String,
}

impl WorkItem {
    pub fn new(id: i32, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
        }
    }
}
