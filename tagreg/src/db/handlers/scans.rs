//! Append-only repository for scan events.
//!
//! Scans are never updated or deleted, so this repository does not implement
//! the full [`crate::db::handlers::Repository`] trait.

use crate::types::{abbrev_uuid, TagId};
use crate::db::{
    errors::Result,
    models::scans::{ScanCreateDBRequest, ScanDBResponse},
};
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

pub struct Scans<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Scans<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Append one scan event. Every public lookup of a registered tag records
    /// a new event; there is no deduplication.
    #[instrument(skip(self, request), fields(tag_id = %abbrev_uuid(&request.tag_id)), err)]
    pub async fn create(&mut self, request: &ScanCreateDBRequest) -> Result<ScanDBResponse> {
        let scan_id = Uuid::new_v4();

        let scan = sqlx::query_as::<_, ScanDBResponse>(
            r#"
            INSERT INTO scans (id, tag_id, latitude, longitude, source_ip)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(scan_id)
        .bind(request.tag_id)
        .bind(request.latitude)
        .bind(request.longitude)
        .bind(&request.source_ip)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(scan)
    }

    /// All scan events for one tag, newest-first.
    #[instrument(skip(self), fields(tag_id = %abbrev_uuid(&tag_id)), err)]
    pub async fn list_for_tag(&mut self, tag_id: TagId) -> Result<Vec<ScanDBResponse>> {
        let scans = sqlx::query_as::<_, ScanDBResponse>("SELECT * FROM scans WHERE tag_id = $1 ORDER BY scanned_at DESC")
            .bind(tag_id)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(scans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::handlers::{Repository, Tags, Users};
    use crate::db::models::tags::TagCreateDBRequest;
    use crate::test_utils::admin_create_request;
    use sqlx::PgPool;

    async fn create_tag(pool: &PgPool) -> TagId {
        let mut conn = pool.acquire().await.unwrap();
        let mut users = Users::new(&mut conn);
        let admin = users.create(&admin_create_request("scans@example.com")).await.unwrap();
        let mut tags = Tags::new(&mut conn);
        tags.create(&TagCreateDBRequest {
            code: Uuid::new_v4().to_string(),
            created_by: admin.id,
        })
        .await
        .unwrap()
        .id
    }

    #[sqlx::test]
    async fn test_every_scan_appends_an_event(pool: PgPool) {
        let tag_id = create_tag(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut scans = Scans::new(&mut conn);

        let request = ScanCreateDBRequest {
            tag_id,
            latitude: Some(-33.4489),
            longitude: Some(-70.6693),
            source_ip: Some("203.0.113.7".to_string()),
        };

        scans.create(&request).await.unwrap();
        scans.create(&request).await.unwrap();
        scans.create(&request).await.unwrap();

        let listed = scans.list_for_tag(tag_id).await.unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].latitude, Some(-33.4489));
        assert_eq!(listed[0].source_ip.as_deref(), Some("203.0.113.7"));
    }

    #[sqlx::test]
    async fn test_scan_without_coordinates(pool: PgPool) {
        let tag_id = create_tag(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut scans = Scans::new(&mut conn);

        let scan = scans
            .create(&ScanCreateDBRequest {
                tag_id,
                latitude: None,
                longitude: None,
                source_ip: None,
            })
            .await
            .unwrap();

        assert!(scan.latitude.is_none());
        assert!(scan.longitude.is_none());
    }
}
