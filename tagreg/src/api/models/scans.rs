//! API models for scan events.

use crate::db::models::scans::ScanDBResponse;
use crate::types::{ScanId, TagId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScanResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: ScanId,
    #[serde(rename = "id_qr")]
    #[schema(value_type = String, format = "uuid")]
    pub tag_id: TagId,
    #[serde(rename = "latitud")]
    pub latitude: Option<f64>,
    #[serde(rename = "longitud")]
    pub longitude: Option<f64>,
    #[serde(rename = "direccion_ip")]
    pub source_ip: Option<String>,
    #[serde(rename = "fecha_escaneo")]
    pub scanned_at: DateTime<Utc>,
}

impl From<ScanDBResponse> for ScanResponse {
    fn from(db: ScanDBResponse) -> Self {
        Self {
            id: db.id,
            tag_id: db.tag_id,
            latitude: db.latitude,
            longitude: db.longitude,
            source_ip: db.source_ip,
            scanned_at: db.scanned_at,
        }
    }
}
