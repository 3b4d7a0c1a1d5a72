//! Database models for scan events.

use crate::types::{ScanId, TagId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone)]
pub struct ScanCreateDBRequest {
    pub tag_id: TagId,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub source_ip: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ScanDBResponse {
    pub id: ScanId,
    pub tag_id: TagId,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub source_ip: Option<String>,
    pub scanned_at: DateTime<Utc>,
}
