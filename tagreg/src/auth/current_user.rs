//! Extractor for the authenticated admin user.

use crate::{
    api::models::users::CurrentUser,
    auth::session,
    errors::{Error, Result},
    AppState,
};
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::trace;

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        // Missing credentials are a 401; a token that is present but fails
        // verification is a 403. The two outcomes are deliberately distinct.
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .ok_or_else(|| Error::Unauthenticated {
                message: Some("No token provided".to_string()),
            })?;

        let auth_str = auth_header.to_str().map_err(|e| Error::Unauthenticated {
            message: Some(format!("Invalid authorization header: {e}")),
        })?;

        let token = auth_str.strip_prefix("Bearer ").ok_or_else(|| Error::Unauthenticated {
            message: Some("No token provided".to_string()),
        })?;

        let user = session::verify_session_token(token, &state.config)?;
        trace!("Authenticated admin: {}", user.email);

        Ok(user)
    }
}
