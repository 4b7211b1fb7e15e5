use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, Header, TokenData, Validation};
use uuid::Uuid;

use crate::entities::token::Claims;
use crate::errors::AuthError;
use crate::settings::JwtKeys;

/// The identity provider signs with HS256 and a shared secret.
const JWT_ALGORITHM: Algorithm = Algorithm::HS256;
const DEFAULT_TOKEN_LIFETIME_MINUTES: i64 = 60;

#[derive(Clone)]
pub struct JwtService {
    keys: Arc<JwtKeys>,
    expiration: Duration,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        JwtService {
            keys: Arc::new(JwtKeys::from_secret(secret)),
            expiration: Duration::minutes(DEFAULT_TOKEN_LIFETIME_MINUTES),
        }
    }

    /// Mints a token for `user_id`. Production tokens come from the identity
    /// provider; this covers local tooling and tests.
    pub fn create_jwt(&self, user_id: &Uuid) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + self.expiration).timestamp() as usize,
            iat: now.timestamp() as usize,
            email: None,
            role: Some("authenticated".to_string()),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.keys.encoding).map_err(|e| {
            tracing::warn!("Failed to create JWT: {}", e);
            AuthError::TokenCreation
        })
    }

    pub fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;
        // Provider tokens carry an audience we do not pin.
        validation.validate_aud = false;

        decode::<Claims>(token, &self.keys.decoding, &validation).map_err(AuthError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "a-test-secret-that-is-long-enough-123";

    #[test]
    fn minted_token_decodes_to_the_same_user() {
        let service = JwtService::new(SECRET);
        let user_id = Uuid::new_v4();

        let token = service.create_jwt(&user_id).unwrap();
        let claims = service.decode_jwt(&token).unwrap().claims;

        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let issuer = JwtService::new("another-secret-that-is-also-long-enough");
        let token = issuer.create_jwt(&Uuid::new_v4()).unwrap();

        let err = JwtService::new(SECRET).decode_jwt(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let service = JwtService::new(SECRET);
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            exp: (Utc::now() - Duration::hours(2)).timestamp() as usize,
            iat: (Utc::now() - Duration::hours(3)).timestamp() as usize,
            email: None,
            role: None,
        };
        let token = encode(&Header::new(JWT_ALGORITHM), &claims, &service.keys.encoding).unwrap();

        let err = service.decode_jwt(&token).unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }
}
