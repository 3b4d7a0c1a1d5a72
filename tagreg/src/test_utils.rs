//! Shared constructors for tests.

use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    api::models::users::Role,
    auth::password,
    build_router,
    config::{Config, EmailTransportConfig},
    db::{
        handlers::{Repository, Users},
        models::{
            pets::PetDBResponse,
            scans::ScanDBResponse,
            tags::TagDBResponse,
            users::{UserCreateDBRequest, UserDBResponse},
        },
    },
    email::EmailService,
    types::TagId,
    AppState,
};

pub fn create_test_config() -> Config {
    let emails_dir = std::env::temp_dir().join("tagreg-test-emails");
    Config {
        secret_key: Some("test-secret-key-for-jwt".to_string()),
        email: crate::config::EmailConfig {
            transport: EmailTransportConfig::File {
                path: emails_dir.to_string_lossy().into_owned(),
            },
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn create_test_app_state(pool: PgPool, config: Config) -> AppState {
    let email = Arc::new(EmailService::new(&config).expect("test email service"));
    AppState::builder().db(pool).config(config).email(email).build()
}

/// Full application router wrapped in a test server.
pub async fn create_test_app(pool: PgPool) -> axum_test::TestServer {
    let state = create_test_app_state(pool, create_test_config());
    let router = build_router(state).expect("test router");
    axum_test::TestServer::new(router).expect("test server")
}

/// Create request with a placeholder hash, for repository-level tests that
/// never log in.
pub fn admin_create_request(email: &str) -> UserCreateDBRequest {
    UserCreateDBRequest {
        email: email.to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
        display_name: Some("Test Admin".to_string()),
        role: Role::Admin,
    }
}

/// Insert an admin with a real password hash, for login flows.
pub async fn create_test_admin(pool: &PgPool, email: &str, plain_password: &str) -> UserDBResponse {
    let mut conn = pool.acquire().await.expect("acquire connection");
    let mut users = Users::new(&mut conn);
    users
        .create(&UserCreateDBRequest {
            email: email.to_string(),
            password_hash: password::hash_string(plain_password).expect("hash password"),
            display_name: Some("Test Admin".to_string()),
            role: Role::Admin,
        })
        .await
        .expect("create test admin")
}

pub fn test_tag(id: TagId) -> TagDBResponse {
    TagDBResponse {
        id,
        code: Uuid::new_v4().to_string(),
        created_by: Uuid::new_v4(),
        active: true,
        created_at: Utc::now(),
    }
}

pub fn test_pet() -> PetDBResponse {
    PetDBResponse {
        id: Uuid::new_v4(),
        tag_id: Uuid::new_v4(),
        pet_name: "Rex".to_string(),
        owner_name: "Ana Torres".to_string(),
        owner_address: "Calle Falsa 123".to_string(),
        owner_email: "ana@example.com".to_string(),
        owner_phone: "555-0100".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn test_scan(tag_id: TagId, coordinates: Option<(f64, f64)>) -> ScanDBResponse {
    ScanDBResponse {
        id: Uuid::new_v4(),
        tag_id,
        latitude: coordinates.map(|(lat, _)| lat),
        longitude: coordinates.map(|(_, lng)| lng),
        source_ip: Some("203.0.113.7".to_string()),
        scanned_at: Utc::now(),
    }
}
