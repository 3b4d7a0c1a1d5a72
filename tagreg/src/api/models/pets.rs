//! API models for pet records: public registration and scan lookup, admin
//! mutation and search.

use crate::api::models::{scans::ScanResponse, tags::TagResponse};
use crate::db::models::pets::{PetDBResponse, PetWithTag};
use crate::types::{PetId, TagId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PetResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: PetId,
    #[serde(rename = "id_qr")]
    #[schema(value_type = String, format = "uuid")]
    pub tag_id: TagId,
    #[serde(rename = "nombre_mascota")]
    pub pet_name: String,
    #[serde(rename = "nombre_dueno")]
    pub owner_name: String,
    #[serde(rename = "direccion_dueno")]
    pub owner_address: String,
    #[serde(rename = "email_dueno")]
    pub owner_email: String,
    #[serde(rename = "telefono_dueno")]
    pub owner_phone: String,
    #[serde(rename = "fecha_registro")]
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/mascotas/registrar`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterPetRequest {
    #[serde(rename = "codigo_qr")]
    pub code: String,
    #[serde(rename = "nombre_mascota")]
    pub pet_name: String,
    #[serde(rename = "nombre_dueno")]
    pub owner_name: String,
    #[serde(rename = "direccion_dueno")]
    pub owner_address: String,
    #[serde(rename = "email_dueno")]
    pub owner_email: String,
    #[serde(rename = "telefono_dueno")]
    pub owner_phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterPetResponse {
    pub success: bool,
    pub mascota: PetResponse,
    pub message: String,
}

/// Optional coordinates a scanning client attaches to the lookup.
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct ScanQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Response for `GET /api/mascotas/qr/{code}`: the pet, its tag, and the scan
/// event this lookup just recorded.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LookupResponse {
    pub mascota: PetResponse,
    pub qr: TagResponse,
    #[serde(rename = "escaneo")]
    pub scan: ScanResponse,
}

/// Body of `PUT /api/mascotas/{id}`; any subset of fields may be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdatePetRequest {
    #[serde(rename = "nombre_mascota")]
    pub pet_name: Option<String>,
    #[serde(rename = "nombre_dueno")]
    pub owner_name: Option<String>,
    #[serde(rename = "direccion_dueno")]
    pub owner_address: Option<String>,
    #[serde(rename = "email_dueno")]
    pub owner_email: Option<String>,
    #[serde(rename = "telefono_dueno")]
    pub owner_phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdatePetResponse {
    pub success: bool,
    pub mascota: PetResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeletePetResponse {
    pub success: bool,
}

/// Query for `GET /api/mascotas/buscar`.
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct SearchQuery {
    pub q: String,
}

/// One search result: the pet plus the tag it is bound to.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PetSearchResult {
    #[serde(flatten)]
    pub mascota: PetResponse,
    pub qr: TagResponse,
}

impl From<PetDBResponse> for PetResponse {
    fn from(db: PetDBResponse) -> Self {
        Self {
            id: db.id,
            tag_id: db.tag_id,
            pet_name: db.pet_name,
            owner_name: db.owner_name,
            owner_address: db.owner_address,
            owner_email: db.owner_email,
            owner_phone: db.owner_phone,
            created_at: db.created_at,
        }
    }
}

impl From<PetWithTag> for PetSearchResult {
    fn from(db: PetWithTag) -> Self {
        Self {
            mascota: db.pet.into(),
            qr: db.tag.into(),
        }
    }
}
