//! Common type definitions.
//!
//! All entity IDs are UUIDs wrapped in type aliases:
//!
//! - [`UserId`]: Admin account identifier
//! - [`TagId`]: Tag (QR identifier) record identifier
//! - [`PetId`]: Pet record identifier
//! - [`ScanId`]: Scan event identifier

use uuid::Uuid;

// Type aliases for IDs
pub type UserId = Uuid;
pub type TagId = Uuid;
pub type PetId = Uuid;
pub type ScanId = Uuid;

/// Abbreviate a UUID to its first 8 characters for more readable logs and traces
/// Example: "550e8400-e29b-41d4-a716-446655440000" -> "550e8400"
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbrev_uuid() {
        let uuid = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(abbrev_uuid(&uuid), "550e8400");
    }
}
