//! API models for admin accounts.

use crate::db::models::users::UserDBResponse;
use crate::types::UserId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Admin role. Only one role exists today; the enum keeps the database
/// representation open for finer-grained back-office roles.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, PartialEq, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
}

/// Admin account as returned by the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: UserId,
    pub email: String,
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "rol")]
    pub role: Role,
}

/// The authenticated admin, decoded from the session token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentUser {
    #[schema(value_type = String, format = "uuid")]
    pub id: UserId,
    pub email: String,
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "rol")]
    pub role: Role,
}

impl From<UserDBResponse> for UserResponse {
    fn from(db: UserDBResponse) -> Self {
        Self {
            id: db.id,
            email: db.email,
            name: db.display_name,
            role: db.role,
        }
    }
}

impl From<UserDBResponse> for CurrentUser {
    fn from(db: UserDBResponse) -> Self {
        Self {
            id: db.id,
            email: db.email,
            name: db.display_name,
            role: db.role,
        }
    }
}
