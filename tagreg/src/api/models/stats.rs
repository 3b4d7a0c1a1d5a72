//! API models for the admin dashboard counters.

use crate::db::models::tags::CreatorStats;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatsResponse {
    #[serde(rename = "totalQr")]
    pub total_tags: i64,
    #[serde(rename = "mascotasRegistradas")]
    pub registered: i64,
    #[serde(rename = "qrPendientes")]
    pub pending: i64,
    #[serde(rename = "totalEscaneos")]
    pub total_scans: i64,
}

impl From<CreatorStats> for StatsResponse {
    fn from(stats: CreatorStats) -> Self {
        Self {
            total_tags: stats.total_tags,
            registered: stats.registered,
            pending: stats.total_tags - stats.registered,
            total_scans: stats.total_scans,
        }
    }
}
