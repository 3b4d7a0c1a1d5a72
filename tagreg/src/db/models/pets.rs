//! Database models for pet records.

use crate::db::models::tags::TagDBResponse;
use crate::types::{PetId, TagId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone)]
pub struct PetCreateDBRequest {
    pub tag_id: TagId,
    pub pet_name: String,
    pub owner_name: String,
    pub owner_address: String,
    pub owner_email: String,
    pub owner_phone: String,
}

/// Partial update: `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct PetUpdateDBRequest {
    pub pet_name: Option<String>,
    pub owner_name: Option<String>,
    pub owner_address: Option<String>,
    pub owner_email: Option<String>,
    pub owner_phone: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct PetDBResponse {
    pub id: PetId,
    pub tag_id: TagId,
    pub pet_name: String,
    pub owner_name: String,
    pub owner_address: String,
    pub owner_email: String,
    pub owner_phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A pet joined with the tag it is bound to (used by search results).
#[derive(Debug, Clone)]
pub struct PetWithTag {
    pub pet: PetDBResponse,
    pub tag: TagDBResponse,
}
