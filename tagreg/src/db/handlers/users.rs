//! Database repository for admin accounts.

use crate::types::{abbrev_uuid, UserId};
use crate::{
    db::{
        errors::{DbError, Result},
        handlers::repository::Repository,
        models::users::{UserCreateDBRequest, UserDBResponse, UserUpdateDBRequest},
    },
};
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing admin accounts
#[derive(Debug, Clone)]
pub struct UserFilter {
    pub skip: i64,
    pub limit: i64,
}

impl Default for UserFilter {
    fn default() -> Self {
        Self { skip: 0, limit: 100 }
    }
}

pub struct Users<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Users<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Look up an admin account by email (login and notification routing).
    #[instrument(skip(self), err)]
    pub async fn get_user_by_email(&mut self, email: &str) -> Result<Option<UserDBResponse>> {
        let user = sqlx::query_as::<_, UserDBResponse>("SELECT * FROM admin_users WHERE email = $1")
            .bind(email)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(user)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Users<'c> {
    type CreateRequest = UserCreateDBRequest;
    type UpdateRequest = UserUpdateDBRequest;
    type Response = UserDBResponse;
    type Id = UserId;
    type Filter = UserFilter;

    #[instrument(skip(self, request), fields(email = %request.email), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let user_id = Uuid::new_v4();

        let user = sqlx::query_as::<_, UserDBResponse>(
            r#"
            INSERT INTO admin_users (id, email, password_hash, display_name, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&request.email)
        .bind(&request.password_hash)
        .bind(&request.display_name)
        .bind(request.role.clone())
        .fetch_one(&mut *self.db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let user = sqlx::query_as::<_, UserDBResponse>("SELECT * FROM admin_users WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(user)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let users = sqlx::query_as::<_, UserDBResponse>("SELECT * FROM admin_users ORDER BY created_at DESC LIMIT $1 OFFSET $2")
            .bind(filter.limit)
            .bind(filter.skip)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(users)
    }

    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM admin_users WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(user_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let user = sqlx::query_as::<_, UserDBResponse>(
            r#"
            UPDATE admin_users SET
                display_name = COALESCE($2, display_name),
                password_hash = COALESCE($3, password_hash)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.display_name)
        .bind(&request.password_hash)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::users::Role;
    use sqlx::PgPool;

    fn create_request(email: &str) -> UserCreateDBRequest {
        UserCreateDBRequest {
            email: email.to_string(),
            password_hash: "$argon2id$fake".to_string(),
            display_name: Some("Test Admin".to_string()),
            role: Role::Admin,
        }
    }

    #[sqlx::test]
    async fn test_create_and_get_by_email(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut users = Users::new(&mut conn);

        let created = users.create(&create_request("admin@example.com")).await.unwrap();
        assert_eq!(created.email, "admin@example.com");
        assert_eq!(created.display_name.as_deref(), Some("Test Admin"));

        let found = users.get_user_by_email("admin@example.com").await.unwrap();
        assert_eq!(found.unwrap().id, created.id);

        let missing = users.get_user_by_email("nobody@example.com").await.unwrap();
        assert!(missing.is_none());
    }

    #[sqlx::test]
    async fn test_duplicate_email_is_unique_violation(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut users = Users::new(&mut conn);

        users.create(&create_request("admin@example.com")).await.unwrap();
        let err = users.create(&create_request("admin@example.com")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[sqlx::test]
    async fn test_update_password_hash(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut users = Users::new(&mut conn);

        let created = users.create(&create_request("admin@example.com")).await.unwrap();

        let updated = users
            .update(
                created.id,
                &UserUpdateDBRequest {
                    display_name: None,
                    password_hash: Some("$argon2id$other".to_string()),
                },
            )
            .await
            .unwrap();

        // Untouched fields keep their values
        assert_eq!(updated.display_name.as_deref(), Some("Test Admin"));
        assert_eq!(updated.password_hash, "$argon2id$other");
    }

    #[sqlx::test]
    async fn test_list_and_delete(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut users = Users::new(&mut conn);

        let a = users.create(&create_request("a@example.com")).await.unwrap();
        users.create(&create_request("b@example.com")).await.unwrap();

        let all = users.list(&UserFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        assert!(users.delete(a.id).await.unwrap());
        assert!(!users.delete(a.id).await.unwrap());
    }
}
