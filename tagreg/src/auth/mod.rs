//! Authentication for the admin surface.
//!
//! Admins log in with email + password via `/api/auth/login`; the password is
//! verified against an Argon2id hash and a signed, time-limited JWT is issued.
//! Protected handlers extract [`crate::api::models::users::CurrentUser`] from
//! the `Authorization: Bearer <jwt>` header.
//!
//! Outcomes are distinguished: a missing token is rejected with 401, a
//! present but invalid/expired/tampered token with 403. There is no refresh,
//! revocation, or multi-factor logic.
//!
//! # Modules
//!
//! - [`current_user`]: Extractor for the authenticated admin in handlers
//! - [`password`]: Password hashing and verification using Argon2
//! - [`session`]: JWT session token creation and verification

pub mod current_user;
pub mod password;
pub mod session;
