//! Database models for admin accounts.

use crate::api::models::users::Role;
use crate::types::UserId;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone)]
pub struct UserCreateDBRequest {
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
    pub role: Role,
}

#[derive(Debug, Clone, Default)]
pub struct UserUpdateDBRequest {
    pub display_name: Option<String>,
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct UserDBResponse {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}
