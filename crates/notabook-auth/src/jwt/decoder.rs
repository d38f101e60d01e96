//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use notabook_core::config::AuthConfig;
use notabook_core::error::AppError;

use super::claims::Claims;

/// Validates HS256 access tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // clock skew

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Checks signature and expiry and returns the claims.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::unauthenticated("Session has expired")
                }
                _ => AppError::unauthenticated("Invalid access token"),
            })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use notabook_core::error::ErrorKind;
    use notabook_core::types::{SessionId, UserId};
    use notabook_entity::user::UserRole;

    use super::*;
    use crate::jwt::JwtEncoder;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_round_trip_preserves_identity() {
        let config = config("a-very-long-test-secret");
        let user_id = UserId::new();
        let session_id = SessionId::new();
        let token = JwtEncoder::new(&config)
            .generate_access_token(
                user_id,
                session_id,
                UserRole::Secretary,
                "Ana",
                Utc::now() + Duration::hours(1),
            )
            .unwrap();

        let claims = JwtDecoder::new(&config).decode_access_token(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.sid, session_id);
        assert_eq!(claims.role, UserRole::Secretary);
        assert_eq!(claims.name, "Ana");
    }

    #[test]
    fn test_rejects_foreign_signature_and_expiry() {
        let token = JwtEncoder::new(&config("secret-number-one-xx"))
            .generate_access_token(
                UserId::new(),
                SessionId::new(),
                UserRole::Admin,
                "Root",
                Utc::now() + Duration::hours(1),
            )
            .unwrap();
        let err = JwtDecoder::new(&config("secret-number-two-xx"))
            .decode_access_token(&token)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);

        let cfg = config("secret-number-one-xx");
        let expired = JwtEncoder::new(&cfg)
            .generate_access_token(
                UserId::new(),
                SessionId::new(),
                UserRole::Admin,
                "Root",
                Utc::now() - Duration::minutes(5),
            )
            .unwrap();
        let err = JwtDecoder::new(&cfg).decode_access_token(&expired).unwrap_err();
        assert_eq!(err.message, "Session has expired");
    }
}
