//! Fire-and-forget owner/admin notifications for registrations and scans.
//!
//! Each event produces two emails: one to the pet owner and one to the admin
//! who issued the tag. Sending happens on a spawned task so the triggering
//! request never waits on (or fails because of) the email provider; failures
//! are logged and swallowed.

use std::sync::Arc;

use sqlx::PgPool;

use crate::db::handlers::{Repository, Users};
use crate::db::models::{pets::PetDBResponse, scans::ScanDBResponse, tags::TagDBResponse, users::UserDBResponse};
use crate::email::EmailService;
use crate::errors::Error;
use crate::types::UserId;
use crate::AppState;

/// Send registration notifications in the background.
pub fn spawn_registration_notifications(state: &AppState, pet: PetDBResponse, tag: TagDBResponse) {
    let db = state.db.clone();
    let email = state.email.clone();
    tokio::spawn(async move {
        notify_registration(db, email, pet, tag).await;
    });
}

/// Send scan alert notifications in the background.
pub fn spawn_scan_notifications(state: &AppState, pet: PetDBResponse, tag: TagDBResponse, scan: ScanDBResponse) {
    let db = state.db.clone();
    let email = state.email.clone();
    tokio::spawn(async move {
        notify_scan(db, email, pet, tag, scan).await;
    });
}

async fn notify_registration(db: PgPool, email: Arc<EmailService>, pet: PetDBResponse, tag: TagDBResponse) {
    if let Err(e) = email.send_registration_confirmation(&pet).await {
        tracing::warn!(pet = %pet.pet_name, owner = %pet.owner_email, error = %e, "Failed to send registration confirmation");
    } else {
        tracing::info!(pet = %pet.pet_name, owner = %pet.owner_email, "Sent registration confirmation");
    }

    match lookup_admin(&db, tag.created_by).await {
        Ok(Some(admin)) => {
            if let Err(e) = email
                .send_registration_admin_notice(&admin.email, admin.display_name.as_deref(), &pet)
                .await
            {
                tracing::warn!(admin = %admin.email, error = %e, "Failed to send registration admin notice");
            }
        }
        Ok(None) => {
            tracing::debug!(created_by = %tag.created_by, "Tag creator not found, skipping admin notice");
        }
        Err(e) => {
            tracing::warn!(created_by = %tag.created_by, error = %e, "Failed to look up tag creator, skipping admin notice");
        }
    }
}

async fn notify_scan(db: PgPool, email: Arc<EmailService>, pet: PetDBResponse, tag: TagDBResponse, scan: ScanDBResponse) {
    if let Err(e) = email.send_scan_alert(&pet, &scan).await {
        tracing::warn!(pet = %pet.pet_name, owner = %pet.owner_email, error = %e, "Failed to send scan alert");
    } else {
        tracing::info!(pet = %pet.pet_name, owner = %pet.owner_email, "Sent scan alert");
    }

    match lookup_admin(&db, tag.created_by).await {
        Ok(Some(admin)) => {
            if let Err(e) = email
                .send_scan_admin_notice(&admin.email, admin.display_name.as_deref(), &pet, &scan)
                .await
            {
                tracing::warn!(admin = %admin.email, error = %e, "Failed to send scan admin notice");
            }
        }
        Ok(None) => {
            tracing::debug!(created_by = %tag.created_by, "Tag creator not found, skipping admin notice");
        }
        Err(e) => {
            tracing::warn!(created_by = %tag.created_by, error = %e, "Failed to look up tag creator, skipping admin notice");
        }
    }
}

/// Look up the admin account that issued a tag.
async fn lookup_admin(pool: &PgPool, user_id: UserId) -> Result<Option<UserDBResponse>, Error> {
    let mut conn = pool.acquire().await.map_err(|e| Error::Internal {
        operation: format!("acquire connection for admin lookup: {e}"),
    })?;

    let mut users = Users::new(&mut conn);
    users.get_by_id(user_id).await.map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::handlers::Users;
    use crate::email::EmailService;
    use crate::test_utils::{admin_create_request, create_test_config, test_pet, test_scan, test_tag};
    use sqlx::PgPool;

    #[sqlx::test]
    async fn test_notify_registration_never_panics_on_missing_admin(pool: PgPool) {
        let config = create_test_config();
        let email = Arc::new(EmailService::new(&config).unwrap());

        // Tag creator does not exist; both sends still complete silently
        let pet = test_pet();
        let tag = test_tag(pet.tag_id);
        notify_registration(pool, email, pet, tag).await;
    }

    #[sqlx::test]
    async fn test_notify_scan_with_existing_admin(pool: PgPool) {
        let config = create_test_config();
        let email = Arc::new(EmailService::new(&config).unwrap());

        let admin = {
            let mut conn = pool.acquire().await.unwrap();
            let mut users = Users::new(&mut conn);
            users.create(&admin_create_request("notify@example.com")).await.unwrap()
        };

        let pet = test_pet();
        let mut tag = test_tag(pet.tag_id);
        tag.created_by = admin.id;
        let scan = test_scan(pet.tag_id, Some((1.0, 2.0)));

        notify_scan(pool, email, pet, tag, scan).await;
    }
}
