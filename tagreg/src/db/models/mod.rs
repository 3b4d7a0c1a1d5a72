//! Database record models matching table schemas.
//!
//! Each model struct corresponds to a table row and derives `sqlx::FromRow`
//! for query results. Create/update request structs carry the writable subset
//! of columns. Database models are distinct from API models so storage and
//! wire representations can evolve independently.

pub mod pets;
pub mod scans;
pub mod tags;
pub mod users;
