//! Database models for tag identifier records.

use crate::db::models::pets::PetDBResponse;
use crate::types::{TagId, UserId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone)]
pub struct TagCreateDBRequest {
    pub code: String,
    pub created_by: UserId,
}

/// Tags are immutable except for deactivation.
#[derive(Debug, Clone, Default)]
pub struct TagUpdateDBRequest {
    pub active: Option<bool>,
}

#[derive(Debug, Clone, FromRow)]
pub struct TagDBResponse {
    pub id: TagId,
    pub code: String,
    pub created_by: UserId,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// A tag joined with its bound pet record, if any.
#[derive(Debug, Clone)]
pub struct TagWithPet {
    pub tag: TagDBResponse,
    pub pet: Option<PetDBResponse>,
}

/// Per-creator dashboard counters.
#[derive(Debug, Clone, Copy)]
pub struct CreatorStats {
    pub total_tags: i64,
    pub registered: i64,
    pub total_scans: i64,
}
