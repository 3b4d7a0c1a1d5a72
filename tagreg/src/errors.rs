use crate::db::errors::DbError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Authentication required but not provided, or credentials rejected
    #[error("Not authenticated")]
    Unauthenticated { message: Option<String> },

    /// A session token was presented but is invalid, tampered or expired
    #[error("Invalid session")]
    InvalidSession,

    /// Invalid request data or business rule violation
    #[error("{message}")]
    BadRequest { message: String },

    /// Requested resource not found
    #[error("{resource} {id} not found")]
    NotFound { resource: String, id: String },

    /// Conflict, e.g. registering an already-bound tag
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Error::InvalidSession => StatusCode::FORBIDDEN,
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Conflict { .. } => StatusCode::CONFLICT,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Database(db_err) => match db_err {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::UniqueViolation { .. } => StatusCode::CONFLICT,
                DbError::ForeignKeyViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::CheckViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthenticated { message } => message.clone().unwrap_or_else(|| "Authentication required".to_string()),
            Error::InvalidSession => "Invalid or expired session token".to_string(),
            Error::BadRequest { message } => message.clone(),
            Error::NotFound { resource, id } => format!("{resource} {id} not found"),
            Error::Conflict { message } => message.clone(),
            Error::Internal { .. } => "Internal server error".to_string(),
            Error::Database(db_err) => match db_err {
                DbError::NotFound => "Resource not found".to_string(),
                DbError::UniqueViolation { constraint, .. } => match constraint.as_deref() {
                    Some(c) if c.contains("tag_id") => "This tag is already registered".to_string(),
                    Some(c) if c.contains("email") => "An account with this email address already exists".to_string(),
                    _ => "Resource already exists".to_string(),
                },
                DbError::ForeignKeyViolation { .. } => "Invalid reference to related resource".to_string(),
                DbError::CheckViolation { .. } => "Invalid data provided".to_string(),
                DbError::Other(_) => "Database error occurred".to_string(),
            },
            Error::Other(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details server-side - different log levels based on severity
        match &self {
            Error::Database(DbError::Other(_)) | Error::Internal { .. } | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Database(_) | Error::Conflict { .. } => {
                tracing::warn!("Conflict or constraint error: {}", self);
            }
            Error::Unauthenticated { .. } | Error::InvalidSession => {
                tracing::info!("Authorization error: {}", self);
            }
            Error::BadRequest { .. } | Error::NotFound { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        let body = json!({ "error": self.user_message() });

        (status, axum::response::Json(body)).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            Error::Unauthenticated { message: None }.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(Error::InvalidSession.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            Error::NotFound {
                resource: "tag".to_string(),
                id: "abc".to_string()
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::Conflict {
                message: "already registered".to_string()
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(Error::Database(DbError::NotFound).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::Database(DbError::UniqueViolation {
                constraint: Some("pets_tag_id_key".to_string()),
                table: Some("pets".to_string()),
                message: "duplicate key".to_string(),
            })
            .status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_user_message_hides_internals() {
        let err = Error::Internal {
            operation: "connect to smtp relay at 10.0.0.3".to_string(),
        };
        assert_eq!(err.user_message(), "Internal server error");
    }

    #[test]
    fn test_unique_violation_on_tag_binding() {
        let err = Error::Database(DbError::UniqueViolation {
            constraint: Some("pets_tag_id_key".to_string()),
            table: Some("pets".to_string()),
            message: "duplicate key value violates unique constraint".to_string(),
        });
        assert_eq!(err.user_message(), "This tag is already registered");
    }
}
