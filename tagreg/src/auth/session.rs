//! JWT session token creation and verification.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    api::models::users::{CurrentUser, Role},
    config::Config,
    errors::Error,
    types::UserId,
};

/// JWT session claims
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: UserId,          // Subject (admin user ID)
    pub email: String,        // Admin email
    pub name: Option<String>, // Display name
    pub role: Role,           // Admin role
    pub exp: i64,             // Expiration time
    pub iat: i64,             // Issued at
}

impl SessionClaims {
    /// Create new session claims for an admin user
    pub fn new(user: &CurrentUser, config: &Config) -> Self {
        let now = Utc::now();
        let exp = now + config.auth.session_ttl;

        Self {
            sub: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        }
    }
}

impl From<SessionClaims> for CurrentUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
            role: claims.role,
        }
    }
}

/// Create a JWT token for an admin session
pub fn create_session_token(user: &CurrentUser, config: &Config) -> Result<String, Error> {
    let claims = SessionClaims::new(user, config);
    let secret_key = config.secret_key.as_ref().ok_or_else(|| Error::Internal {
        operation: "JWT sessions: secret_key is required".to_string(),
    })?;

    let key = EncodingKey::from_secret(secret_key.as_bytes());
    encode(&Header::default(), &claims, &key).map_err(|e| Error::Internal {
        operation: format!("create JWT: {e}"),
    })
}

/// Verify and decode a JWT session token
pub fn verify_session_token(token: &str, config: &Config) -> Result<CurrentUser, Error> {
    let secret_key = config.secret_key.as_ref().ok_or_else(|| Error::Internal {
        operation: "JWT sessions: secret_key is required".to_string(),
    })?;

    let key = DecodingKey::from_secret(secret_key.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<SessionClaims>(token, &key, &validation).map_err(|e| match e.kind() {
        // Client errors (403) - malformed tokens, invalid claims, expired tokens
        jsonwebtoken::errors::ErrorKind::InvalidToken
        | jsonwebtoken::errors::ErrorKind::InvalidSignature
        | jsonwebtoken::errors::ErrorKind::ExpiredSignature
        | jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(_)
        | jsonwebtoken::errors::ErrorKind::InvalidIssuer
        | jsonwebtoken::errors::ErrorKind::InvalidAudience
        | jsonwebtoken::errors::ErrorKind::InvalidSubject
        | jsonwebtoken::errors::ErrorKind::ImmatureSignature
        | jsonwebtoken::errors::ErrorKind::Base64(_)
        | jsonwebtoken::errors::ErrorKind::Json(_)
        | jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => Error::InvalidSession,

        // Server errors (500) - key issues, internal failures
        _ => Error::Internal {
            operation: format!("JWT verification: {e}"),
        },
    })?;

    Ok(CurrentUser::from(token_data.claims))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_config;
    use uuid::Uuid;

    fn create_test_user() -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
            name: Some("Test Admin".to_string()),
            role: Role::Admin,
        }
    }

    #[test]
    fn test_create_and_verify_session_token() {
        let config = create_test_config();
        let user = create_test_user();

        let token = create_session_token(&user, &config).unwrap();
        assert!(!token.is_empty());

        let verified = verify_session_token(&token, &config).unwrap();
        assert_eq!(verified.id, user.id);
        assert_eq!(verified.email, user.email);
        assert_eq!(verified.name, user.name);
        assert_eq!(verified.role, user.role);
    }

    #[test]
    fn test_verify_token_wrong_secret() {
        let mut config = create_test_config();
        let user = create_test_user();

        let token = create_session_token(&user, &config).unwrap();

        config.secret_key = Some("different-secret".to_string());
        let result = verify_session_token(&token, &config);
        // Tampered/forged tokens are a 403, not a server error
        assert!(matches!(result.unwrap_err(), Error::InvalidSession));
    }

    #[test]
    fn test_verify_expired_token() {
        let config = create_test_config();
        let user = create_test_user();

        // Manually create an expired token by setting exp in the past
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.clone(),
            exp: (now - chrono::Duration::seconds(3600)).timestamp(),
            iat: now.timestamp(),
        };

        let secret_key = config.secret_key.as_ref().unwrap();
        let key = EncodingKey::from_secret(secret_key.as_bytes());
        let token = encode(&Header::default(), &claims, &key).unwrap();

        let result = verify_session_token(&token, &config);
        assert!(matches!(result.unwrap_err(), Error::InvalidSession));
    }

    #[test]
    fn test_verify_malformed_token() {
        let config = create_test_config();

        for token in ["not.a.token", "invalid", "", "too.many.parts.in.this.token"] {
            let result = verify_session_token(token, &config);
            assert!(
                matches!(result.unwrap_err(), Error::InvalidSession),
                "Expected InvalidSession for token: {token}"
            );
        }
    }

    #[test]
    fn test_missing_secret_is_internal_error() {
        let mut config = create_test_config();
        config.secret_key = None;

        let result = create_session_token(&create_test_user(), &config);
        assert!(matches!(result.unwrap_err(), Error::Internal { .. }));
    }
}
