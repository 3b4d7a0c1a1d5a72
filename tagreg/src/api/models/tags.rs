//! API models for tag identifier records.

use crate::api::models::pets::PetResponse;
use crate::db::models::tags::{TagDBResponse, TagWithPet};
use crate::types::{TagId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TagResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: TagId,
    #[serde(rename = "codigo_qr")]
    pub code: String,
    #[serde(rename = "id_admin_creador")]
    #[schema(value_type = String, format = "uuid")]
    pub created_by: UserId,
    #[serde(rename = "activo")]
    pub active: bool,
    #[serde(rename = "fecha_creacion")]
    pub created_at: DateTime<Utc>,
}

/// Response for `POST /api/qr/generate`: the stored record, the URL the QR
/// image encodes, and the image itself as a base64 data URL.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateQrResponse {
    pub qr: TagResponse,
    #[serde(rename = "qrUrl")]
    pub qr_url: String,
    #[serde(rename = "qrImage")]
    pub qr_image: String,
}

/// One entry of `GET /api/qr/list`: the tag plus its bound pet, if registered.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TagListEntry {
    #[serde(flatten)]
    pub qr: TagResponse,
    pub mascota: Option<PetResponse>,
}

/// Response for `GET /api/qr/{code}/status`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    #[serde(rename = "registrado")]
    pub registered: bool,
    pub mascota: Option<PetResponse>,
    pub qr: TagResponse,
}

impl From<TagDBResponse> for TagResponse {
    fn from(db: TagDBResponse) -> Self {
        Self {
            id: db.id,
            code: db.code,
            created_by: db.created_by,
            active: db.active,
            created_at: db.created_at,
        }
    }
}

impl From<TagWithPet> for TagListEntry {
    fn from(db: TagWithPet) -> Self {
        Self {
            qr: db.tag.into(),
            mascota: db.pet.map(Into::into),
        }
    }
}
