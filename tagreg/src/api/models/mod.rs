//! API request and response data models.
//!
//! These structures define the public API contract and are kept separate from
//! the database models in [`crate::db::models`]. Where the deployed front end
//! already speaks a field name (e.g. `codigo_qr`, `nombre_mascota`), the
//! serde rename preserves it on the wire.

pub mod auth;
pub mod pets;
pub mod scans;
pub mod stats;
pub mod tags;
pub mod users;
