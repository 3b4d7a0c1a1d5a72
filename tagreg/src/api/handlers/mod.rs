//! HTTP request handlers for all API endpoints.
//!
//! Each handler deserializes the request, runs the operation through the
//! repositories in [`crate::db::handlers`], and serializes the response.
//! Protected handlers take [`crate::api::models::users::CurrentUser`] as an
//! extractor argument; public handlers (status, registration, scan lookup)
//! do not.
//!
//! # Handler Modules
//!
//! - [`auth`]: Admin login and session verification
//! - [`tags`]: Tag issuance, listing, and public status checks
//! - [`pets`]: Public registration and scan lookup, admin mutation and search
//! - [`stats`]: Per-admin dashboard counters
//! - [`static_assets`]: Embedded admin/registration page serving
//!
//! # Error Handling
//!
//! Handlers return [`crate::errors::Error`], which converts into the
//! appropriate HTTP status code and JSON error body.

pub mod auth;
pub mod pets;
pub mod static_assets;
pub mod stats;
pub mod tags;
