use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::config::SecretManager;
use crate::errors::internal::TokenError;
use crate::errors::InternalError;
use crate::types::db::user::UserRole;
use crate::types::internal::auth::Claims;

/// HS256 JWT issuance and validation
///
/// Sessions are owned elsewhere; this service only mints operator tokens
/// from the CLI and validates bearer tokens on incoming requests.
pub struct TokenProvider {
    secret_manager: Arc<SecretManager>,
}

impl TokenProvider {
    pub fn new(secret_manager: Arc<SecretManager>) -> Self {
        Self { secret_manager }
    }

    /// Mint a token for `sub` with the given role
    ///
    /// # Returns
    /// * `Ok((token, claims))` - Encoded JWT and the claims it carries
    /// * `Err(InternalError)` - Encoding failed
    pub fn issue_token(
        &self,
        sub: &str,
        role: UserRole,
        ttl_minutes: i64,
    ) -> Result<(String, Claims), InternalError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: sub.to_string(),
            role: role.as_str().to_string(),
            exp: now + ttl_minutes * 60,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
        )
        .map_err(|e| InternalError::crypto("jwt_generation", e.to_string()))?;

        Ok((token, claims))
    }

    /// Validate a JWT and return its claims
    pub fn validate_jwt(&self, token: &str) -> Result<Claims, InternalError> {
        let validation = Validation::new(Algorithm::HS256);

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            JwtErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid {
                reason: "invalid signature or malformed".to_string(),
            },
        })?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> TokenProvider {
        TokenProvider::new(Arc::new(SecretManager::from_values(
            "test-secret-key-minimum-32-characters-long",
            "test-pepper-for-unit-tests",
        )))
    }

    #[test]
    fn test_issued_token_validates() {
        let tokens = provider();
        let (token, claims) = tokens.issue_token("ops-1", UserRole::Hr, 15).unwrap();

        let decoded = tokens.validate_jwt(&token).unwrap();
        assert_eq!(decoded, claims);
        assert_eq!(decoded.role, "hr");
        assert_eq!(decoded.exp - decoded.iat, 15 * 60);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let tokens = provider();
        let (token, _) = tokens.issue_token("ops-1", UserRole::Admin, -10).unwrap();

        let err = tokens.validate_jwt(&token).unwrap_err();
        assert!(matches!(err, InternalError::Token(TokenError::Expired)));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let (token, _) = provider().issue_token("ops-1", UserRole::Admin, 15).unwrap();
        let other = TokenProvider::new(Arc::new(SecretManager::from_values(
            "another-secret-key-minimum-32-characters",
            "test-pepper-for-unit-tests",
        )));

        let err = other.validate_jwt(&token).unwrap_err();
        assert!(matches!(err, InternalError::Token(TokenError::Invalid { .. })));
    }
}
