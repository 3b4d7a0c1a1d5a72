//! # tagreg: Pet-Tag QR Registration Service
//!
//! `tagreg` is the back office and public surface for printed pet-tag QR
//! codes. An administrator issues tags, each encoding a registration URL for
//! an opaque random token. A pet owner who receives a physical tag opens that
//! URL and binds their pet and contact details to the token. When a finder
//! later scans the tag, the owner's contact details are displayed, the scan
//! (with optional geolocation) is appended to a log, and the owner and the
//! issuing admin are emailed the location.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for
//! the HTTP layer and uses PostgreSQL (via SQLx) for all persistence. Every
//! request is a single round trip to the database plus, for the two
//! notification-bearing events (registration and scan), a fire-and-forget
//! email task. There are no background workers, queues, or caches.
//!
//! ### Core Components
//!
//! The **API layer** ([`api`]) exposes the admin surface (login, tag
//! issuance, pet mutation, search, stats) and the public surface (tag status,
//! registration, scan lookup) under `/api/*`.
//!
//! The **authentication layer** ([`auth`]) verifies admin passwords with
//! Argon2 and issues signed, time-limited JWT session tokens carried in the
//! `Authorization: Bearer` header.
//!
//! The **database layer** ([`db`]) uses the repository pattern: one
//! repository per table, returning typed records and classifying constraint
//! violations so handlers can map them to HTTP status codes.
//!
//! **Notifications** ([`email`]) are templated HTML emails sent through
//! lettre (SMTP, or files on disk in development). A notification failure
//! never fails the request that triggered it.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use tagreg::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = tagreg::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     tagreg::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod email;
pub mod errors;
mod notifications;
mod openapi;
mod qr;
mod static_assets;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    routing::{delete, get, post, put},
    Json, Router,
};
use bon::Builder;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, instrument, Level};
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

use crate::{
    api::models::users::Role,
    auth::password,
    db::handlers::{Repository, Users},
    db::models::users::{UserCreateDBRequest, UserUpdateDBRequest},
    email::EmailService,
    errors::Error,
    openapi::ApiDoc,
    types::UserId,
};

pub use config::Config;

/// Application state shared across all request handlers.
///
/// - `db`: PostgreSQL connection pool
/// - `config`: Application configuration loaded from file/environment
/// - `email`: Transactional email service (shared by the notification tasks)
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    pub email: Arc<EmailService>,
}

/// Get the tagreg database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Create the initial admin account if it doesn't exist.
///
/// Idempotent: creates the account on first startup, or refreshes the
/// password of an existing one when `password` is provided. Admin accounts
/// are provisioned only here; there is no runtime signup surface.
///
/// Returns the admin's user ID, or `None` when no account exists and no
/// password was configured to create one with.
#[instrument(skip_all)]
pub async fn create_initial_admin_user(email: &str, password: Option<&str>, db: &PgPool) -> errors::Result<Option<UserId>> {
    let mut conn = db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut user_repo = Users::new(&mut conn);

    if let Some(existing) = user_repo.get_user_by_email(email).await? {
        if let Some(pwd) = password {
            let password_hash = password::hash_string(pwd)?;
            user_repo
                .update(
                    existing.id,
                    &UserUpdateDBRequest {
                        display_name: None,
                        password_hash: Some(password_hash),
                    },
                )
                .await?;
            info!(email, "Refreshed password for existing admin account");
        }
        return Ok(Some(existing.id));
    }

    let Some(pwd) = password else {
        tracing::warn!(email, "admin_password not set; skipping initial admin provisioning");
        return Ok(None);
    };

    let created = user_repo
        .create(&UserCreateDBRequest {
            email: email.to_string(),
            password_hash: password::hash_string(pwd)?,
            display_name: None,
            role: Role::Admin,
        })
        .await?;

    info!(email, "Created initial admin account");
    Ok(Some(created.id))
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut cors = if config.cors.allowed_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
    } else {
        let mut origins = Vec::new();
        for origin in &config.cors.allowed_origins {
            origins.push(origin.parse::<HeaderValue>()?);
        }
        CorsLayer::new().allow_origin(origins).allow_methods(Any).allow_headers(Any)
    };

    if let Some(max_age) = config.cors.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Liveness probe
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "OK",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Build the application router with all endpoints and middleware.
///
/// - REST API under `/api/*` (admin + public endpoints)
/// - RapiDoc API documentation at `/docs`
/// - Embedded static admin/registration pages as the fallback
/// - CORS and tracing layers
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let api_routes = Router::new()
        // Authentication
        .route("/auth/login", post(api::handlers::auth::login))
        .route("/auth/verify", get(api::handlers::auth::verify))
        // Tag issuance and status
        .route("/qr/generate", post(api::handlers::tags::generate))
        .route("/qr/list", get(api::handlers::tags::list))
        .route("/qr/{code}/status", get(api::handlers::tags::status))
        // Pet registration, lookup and admin mutation
        .route("/mascotas/registrar", post(api::handlers::pets::register))
        .route("/mascotas/qr/{code}", get(api::handlers::pets::lookup))
        .route("/mascotas/buscar", get(api::handlers::pets::search))
        .route("/mascotas/{id}", put(api::handlers::pets::update_pet))
        .route("/mascotas/{id}", delete(api::handlers::pets::delete_pet))
        // Dashboard counters
        .route("/stats", get(api::handlers::stats::stats))
        // Liveness
        .route("/health", get(health))
        .with_state(state.clone());

    let cors_layer = create_cors_layer(&state.config)?;

    let router = Router::new()
        .nest("/api", api_routes)
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/docs"))
        .fallback(get(api::handlers::static_assets::serve_embedded_asset))
        .layer(cors_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    Ok(router)
}

/// Main application struct that owns all resources and lifecycle.
///
/// 1. **Create**: [`Application::new`] connects to the database, runs
///    migrations, provisions the initial admin account and builds the router
/// 2. **Serve**: [`Application::serve`] binds the TCP listener and handles
///    requests until the shutdown future resolves
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(&config.database.url)
            .await?;

        migrator().run(&pool).await?;

        create_initial_admin_user(&config.admin_email, config.admin_password.as_deref(), &pool).await?;

        let email = Arc::new(EmailService::new(&config)?);

        let state = AppState::builder().db(pool.clone()).config(config.clone()).email(email).build();

        let router = build_router(state)?;

        Ok(Self { router, config, pool })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("tagreg listening on http://{}", bind_addr);

        // ConnectInfo feeds the scan log's source address
        axum::serve(
            listener,
            self.router.into_make_service_with_connect_info::<std::net::SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}
