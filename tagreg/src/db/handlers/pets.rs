//! Database repository for pet records.

use std::collections::HashMap;

use crate::types::{abbrev_uuid, PetId, TagId};
use crate::{
    db::{
        errors::{DbError, Result},
        handlers::repository::Repository,
        models::{
            pets::{PetCreateDBRequest, PetDBResponse, PetUpdateDBRequest, PetWithTag},
            tags::TagDBResponse,
        },
    },
};
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing pets. `search` matches owner name, owner email and pet
/// name case-insensitively as a substring.
#[derive(Debug, Clone, Default)]
pub struct PetFilter {
    pub search: Option<String>,
}

pub struct Pets<'c> {
    db: &'c mut PgConnection,
}

const SEARCH_SQL: &str = r#"
    SELECT * FROM pets
    WHERE owner_name ILIKE $1 OR owner_email ILIKE $1 OR pet_name ILIKE $1
    ORDER BY created_at DESC
"#;

impl<'c> Pets<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// The pet bound to a tag, if the tag has been registered.
    #[instrument(skip(self), fields(tag_id = %abbrev_uuid(&tag_id)), err)]
    pub async fn get_by_tag_id(&mut self, tag_id: TagId) -> Result<Option<PetDBResponse>> {
        let pet = sqlx::query_as::<_, PetDBResponse>("SELECT * FROM pets WHERE tag_id = $1")
            .bind(tag_id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(pet)
    }

    /// Substring search across owner name, owner email and pet name, returning
    /// each match with its bound tag.
    #[instrument(skip(self), err)]
    pub async fn search_with_tags(&mut self, query: &str) -> Result<Vec<PetWithTag>> {
        let pattern = format!("%{query}%");
        let pets = sqlx::query_as::<_, PetDBResponse>(SEARCH_SQL)
            .bind(&pattern)
            .fetch_all(&mut *self.db)
            .await?;

        let tag_ids: Vec<TagId> = pets.iter().map(|p| p.tag_id).collect();
        let tags = sqlx::query_as::<_, TagDBResponse>("SELECT * FROM tags WHERE id = ANY($1)")
            .bind(&tag_ids)
            .fetch_all(&mut *self.db)
            .await?;

        let mut by_id: HashMap<TagId, TagDBResponse> = tags.into_iter().map(|t| (t.id, t)).collect();

        Ok(pets
            .into_iter()
            .filter_map(|pet| {
                let tag = by_id.remove(&pet.tag_id)?;
                Some(PetWithTag { pet, tag })
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Pets<'c> {
    type CreateRequest = PetCreateDBRequest;
    type UpdateRequest = PetUpdateDBRequest;
    type Response = PetDBResponse;
    type Id = PetId;
    type Filter = PetFilter;

    #[instrument(skip(self, request), fields(tag_id = %abbrev_uuid(&request.tag_id)), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let pet_id = Uuid::new_v4();

        // The UNIQUE constraint on tag_id turns a concurrent double
        // registration into a UniqueViolation rather than a second row.
        let pet = sqlx::query_as::<_, PetDBResponse>(
            r#"
            INSERT INTO pets (id, tag_id, pet_name, owner_name, owner_address, owner_email, owner_phone)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(pet_id)
        .bind(request.tag_id)
        .bind(&request.pet_name)
        .bind(&request.owner_name)
        .bind(&request.owner_address)
        .bind(&request.owner_email)
        .bind(&request.owner_phone)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(pet)
    }

    #[instrument(skip(self), fields(pet_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let pet = sqlx::query_as::<_, PetDBResponse>("SELECT * FROM pets WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(pet)
    }

    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let pets = match &filter.search {
            Some(query) => {
                let pattern = format!("%{query}%");
                sqlx::query_as::<_, PetDBResponse>(SEARCH_SQL)
                    .bind(&pattern)
                    .fetch_all(&mut *self.db)
                    .await?
            }
            None => {
                sqlx::query_as::<_, PetDBResponse>("SELECT * FROM pets ORDER BY created_at DESC")
                    .fetch_all(&mut *self.db)
                    .await?
            }
        };

        Ok(pets)
    }

    #[instrument(skip(self), fields(pet_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM pets WHERE id = $1").bind(id).execute(&mut *self.db).await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(pet_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let pet = sqlx::query_as::<_, PetDBResponse>(
            r#"
            UPDATE pets SET
                pet_name = COALESCE($2, pet_name),
                owner_name = COALESCE($3, owner_name),
                owner_address = COALESCE($4, owner_address),
                owner_email = COALESCE($5, owner_email),
                owner_phone = COALESCE($6, owner_phone),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.pet_name)
        .bind(&request.owner_name)
        .bind(&request.owner_address)
        .bind(&request.owner_email)
        .bind(&request.owner_phone)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(pet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::handlers::{Tags, Users};
    use crate::db::models::tags::TagCreateDBRequest;
    use crate::test_utils::admin_create_request;
    use sqlx::PgPool;

    async fn create_tag(pool: &PgPool) -> TagId {
        let mut conn = pool.acquire().await.unwrap();
        let mut users = Users::new(&mut conn);
        let admin = users.create(&admin_create_request("pets@example.com")).await.unwrap();
        let mut tags = Tags::new(&mut conn);
        tags.create(&TagCreateDBRequest {
            code: Uuid::new_v4().to_string(),
            created_by: admin.id,
        })
        .await
        .unwrap()
        .id
    }

    fn rex(tag_id: TagId) -> PetCreateDBRequest {
        PetCreateDBRequest {
            tag_id,
            pet_name: "Rex".to_string(),
            owner_name: "Ana Torres".to_string(),
            owner_address: "Calle Falsa 123".to_string(),
            owner_email: "ana@example.com".to_string(),
            owner_phone: "555-0100".to_string(),
        }
    }

    #[sqlx::test]
    async fn test_at_most_one_pet_per_tag(pool: PgPool) {
        let tag_id = create_tag(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut pets = Pets::new(&mut conn);

        pets.create(&rex(tag_id)).await.unwrap();

        // Second binding against the same tag hits the UNIQUE constraint
        let err = pets.create(&rex(tag_id)).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        let listed = pets.list(&PetFilter::default()).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[sqlx::test]
    async fn test_partial_update(pool: PgPool) {
        let tag_id = create_tag(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut pets = Pets::new(&mut conn);

        let pet = pets.create(&rex(tag_id)).await.unwrap();

        let updated = pets
            .update(
                pet.id,
                &PetUpdateDBRequest {
                    owner_phone: Some("555-0199".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.owner_phone, "555-0199");
        assert_eq!(updated.pet_name, "Rex");
        assert_eq!(updated.owner_email, "ana@example.com");
    }

    #[sqlx::test]
    async fn test_update_unknown_pet_is_not_found(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut pets = Pets::new(&mut conn);

        let err = pets.update(Uuid::new_v4(), &PetUpdateDBRequest::default()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound));
    }

    #[sqlx::test]
    async fn test_search_matches_owner_email_substring(pool: PgPool) {
        let tag_a = create_tag(&pool).await;
        let mut conn = pool.acquire().await.unwrap();

        {
            let mut pets = Pets::new(&mut conn);
            pets.create(&rex(tag_a)).await.unwrap();
        }

        let mut pets = Pets::new(&mut conn);
        // Case-insensitive substring present in exactly one pet's owner email
        let matches = pets.search_with_tags("ANA@EX").await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].pet.pet_name, "Rex");
        assert_eq!(matches[0].tag.id, tag_a);

        let none = pets.search_with_tags("zzz-no-match").await.unwrap();
        assert!(none.is_empty());
    }

    #[sqlx::test]
    async fn test_delete_leaves_tag_reusable(pool: PgPool) {
        let tag_id = create_tag(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut pets = Pets::new(&mut conn);

        let pet = pets.create(&rex(tag_id)).await.unwrap();
        assert!(pets.delete(pet.id).await.unwrap());

        // The tag is unbound again and can take a new registration
        let rebound = pets.create(&rex(tag_id)).await.unwrap();
        assert_ne!(rebound.id, pet.id);
    }
}
