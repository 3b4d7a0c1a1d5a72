//! Repository implementations for database access.
//!
//! Each repository wraps a SQLx connection or transaction, provides
//! strongly-typed CRUD operations, and returns domain models from
//! [`crate::db::models`]. CRUD-shaped repositories implement the
//! [`Repository`] trait; the append-only [`Scans`] log exposes inherent
//! methods only.
//!
//! # Available Repositories
//!
//! - [`Users`]: Admin account storage and lookup
//! - [`Tags`]: Tag identifier issuance and listing
//! - [`Pets`]: Pet record binding, mutation and search
//! - [`Scans`]: Append-only scan event log
//!
//! # Common Pattern
//!
//! ```ignore
//! use tagreg::db::handlers::{Repository, Tags};
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut conn = pool.acquire().await?;
//!     let mut tags = Tags::new(&mut conn);
//!     let tag = tags.get_by_code("550e8400-...").await?;
//!     Ok(())
//! }
//! ```

pub mod pets;
pub mod repository;
pub mod scans;
pub mod tags;
pub mod users;

pub use pets::Pets;
pub use repository::Repository;
pub use scans::Scans;
pub use tags::Tags;
pub use users::Users;
