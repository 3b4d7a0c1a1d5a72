//! Database repository for tag identifier records.

use std::collections::HashMap;

use crate::types::{abbrev_uuid, TagId, UserId};
use crate::{
    db::{
        errors::{DbError, Result},
        handlers::repository::Repository,
        models::{
            pets::PetDBResponse,
            tags::{CreatorStats, TagCreateDBRequest, TagDBResponse, TagUpdateDBRequest, TagWithPet},
        },
    },
};
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing tags
#[derive(Debug, Clone)]
pub struct TagFilter {
    pub created_by: UserId,
}

pub struct Tags<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Tags<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Look up a tag by its opaque code (the token printed on the physical tag).
    #[instrument(skip(self), err)]
    pub async fn get_by_code(&mut self, code: &str) -> Result<Option<TagDBResponse>> {
        let tag = sqlx::query_as::<_, TagDBResponse>("SELECT * FROM tags WHERE code = $1")
            .bind(code)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(tag)
    }

    /// List a creator's tags newest-first, each with its bound pet (if any).
    #[instrument(skip(self), fields(created_by = %abbrev_uuid(&created_by)), err)]
    pub async fn list_with_pets(&mut self, created_by: UserId) -> Result<Vec<TagWithPet>> {
        let tags = sqlx::query_as::<_, TagDBResponse>("SELECT * FROM tags WHERE created_by = $1 ORDER BY created_at DESC")
            .bind(created_by)
            .fetch_all(&mut *self.db)
            .await?;

        let tag_ids: Vec<TagId> = tags.iter().map(|t| t.id).collect();
        let pets = sqlx::query_as::<_, PetDBResponse>("SELECT * FROM pets WHERE tag_id = ANY($1)")
            .bind(&tag_ids)
            .fetch_all(&mut *self.db)
            .await?;

        let mut by_tag: HashMap<TagId, PetDBResponse> = pets.into_iter().map(|p| (p.tag_id, p)).collect();

        Ok(tags
            .into_iter()
            .map(|tag| {
                let pet = by_tag.remove(&tag.id);
                TagWithPet { tag, pet }
            })
            .collect())
    }

    /// Dashboard counters for one creator's tags.
    #[instrument(skip(self), fields(created_by = %abbrev_uuid(&created_by)), err)]
    pub async fn creator_stats(&mut self, created_by: UserId) -> Result<CreatorStats> {
        let total_tags = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tags WHERE created_by = $1")
            .bind(created_by)
            .fetch_one(&mut *self.db)
            .await?;

        let registered =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tags t JOIN pets p ON p.tag_id = t.id WHERE t.created_by = $1")
                .bind(created_by)
                .fetch_one(&mut *self.db)
                .await?;

        let total_scans =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM scans s JOIN tags t ON s.tag_id = t.id WHERE t.created_by = $1")
                .bind(created_by)
                .fetch_one(&mut *self.db)
                .await?;

        Ok(CreatorStats {
            total_tags,
            registered,
            total_scans,
        })
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Tags<'c> {
    type CreateRequest = TagCreateDBRequest;
    type UpdateRequest = TagUpdateDBRequest;
    type Response = TagDBResponse;
    type Id = TagId;
    type Filter = TagFilter;

    #[instrument(skip(self, request), fields(created_by = %abbrev_uuid(&request.created_by)), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let tag_id = Uuid::new_v4();

        let tag = sqlx::query_as::<_, TagDBResponse>(
            r#"
            INSERT INTO tags (id, code, created_by, active)
            VALUES ($1, $2, $3, TRUE)
            RETURNING *
            "#,
        )
        .bind(tag_id)
        .bind(&request.code)
        .bind(request.created_by)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(tag)
    }

    #[instrument(skip(self), fields(tag_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let tag = sqlx::query_as::<_, TagDBResponse>("SELECT * FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(tag)
    }

    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let tags = sqlx::query_as::<_, TagDBResponse>("SELECT * FROM tags WHERE created_by = $1 ORDER BY created_at DESC")
            .bind(filter.created_by)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(tags)
    }

    #[instrument(skip(self), fields(tag_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1").bind(id).execute(&mut *self.db).await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(tag_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let tag = sqlx::query_as::<_, TagDBResponse>(
            r#"
            UPDATE tags SET active = COALESCE($2, active)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.active)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(tag)
    }
}
