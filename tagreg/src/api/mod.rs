//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! - **Authentication** (`/api/auth/*`): Admin login and session verification
//! - **Tags** (`/api/qr/*`): Tag issuance, listing and public status checks
//! - **Pets** (`/api/mascotas/*`): Public registration and scan lookup, admin
//!   mutation and search
//! - **Stats** (`/api/stats`): Per-admin dashboard counters
//!
//! Wire field names follow the deployed front end (and the URLs already
//! printed on physical tags), which is why the JSON surface is Spanish while
//! the code is not.
//!
//! # OpenAPI Documentation
//!
//! All endpoints are documented with `utoipa` annotations; the rendered
//! documentation is served at `/docs`.

pub mod handlers;
pub mod models;
