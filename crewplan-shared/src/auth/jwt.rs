/// JWT identity token issuance and verification
///
/// Tokens are signed with HS256 and embed the authenticated user's identity
/// (id, email, role) plus standard issuer/expiry claims. The signing secret
/// and token lifetime are supplied once at construction via [`JwtConfig`];
/// nothing here reads ambient process state, which keeps the service
/// testable in isolation.
///
/// Callers must treat every verification failure (malformed token, bad
/// signature, expiry) uniformly as "unauthenticated". [`TokenService::verify`]
/// returns a single error type and never distinguishes reasons in a way that
/// should be surfaced to clients.
///
/// # Example
///
/// ```
/// use crewplan_shared::auth::jwt::{JwtConfig, TokenService};
/// use crewplan_shared::models::user::Role;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service = TokenService::new(JwtConfig {
///     secret: "a-secret-key-at-least-32-bytes-long!".to_string(),
///     expires_hours: 24,
/// });
///
/// let token = service.issue(42, "pm@example.com", Role::ProjectManager)?;
/// let claims = service.verify(&token)?;
/// assert_eq!(claims.sub, 42);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::user::Role;

const ISSUER: &str = "crewplan";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token is invalid for any reason (malformed, bad signature, expired)
    #[error("Invalid token")]
    Invalid,
}

/// JWT configuration supplied at construction
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for HS256 signing (at least 32 bytes)
    pub secret: String,

    /// Token lifetime in hours
    pub expires_hours: i64,
}

/// Claims embedded in an identity token
///
/// Standard claims (`iss`, `iat`, `exp`) plus the user's identity, which the
/// authorization gate attaches to each request after verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - numeric user ID
    pub sub: i64,

    /// User email (normalized lowercase)
    pub email: String,

    /// User role, fixed at registration
    pub role: Role,

    /// Issuer - always "crewplan"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Issues and verifies identity tokens
///
/// Holds the prepared signing keys and validation rules; cheap to clone via
/// the owning application state.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expires_in: Duration,
}

impl TokenService {
    /// Creates a token service from explicit configuration
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.validate_exp = true;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            expires_in: Duration::hours(config.expires_hours),
        }
    }

    /// Issues a signed token embedding the user's identity
    ///
    /// # Errors
    ///
    /// Returns `JwtError::CreateError` if encoding fails.
    pub fn issue(&self, user_id: i64, email: &str, role: Role) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            role,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + self.expires_in).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
    }

    /// Verifies a token and extracts its claims
    ///
    /// All failure modes (malformed input, signature mismatch, expiry, wrong
    /// issuer) collapse into `JwtError::Invalid` so callers cannot leak the
    /// reason to clients.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| JwtError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(JwtConfig {
            secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            expires_hours: 24,
        })
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let service = service();

        let token = service
            .issue(7, "pm@example.com", Role::ProjectManager)
            .expect("Should issue token");

        let claims = service.verify(&token).expect("Should verify token");
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.email, "pm@example.com");
        assert_eq!(claims.role, Role::ProjectManager);
        assert_eq!(claims.iss, "crewplan");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let token = service()
            .issue(1, "tm@example.com", Role::TeamMember)
            .unwrap();

        let other = TokenService::new(JwtConfig {
            secret: "a-completely-different-secret-also-32b".to_string(),
            expires_hours: 24,
        });

        assert!(matches!(other.verify(&token), Err(JwtError::Invalid)));
    }

    #[test]
    fn test_verify_expired_token() {
        let expired = TokenService::new(JwtConfig {
            secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            expires_hours: -1,
        });

        let token = expired
            .issue(1, "tm@example.com", Role::TeamMember)
            .unwrap();

        // Same secret, but the token's exp is in the past.
        assert!(matches!(service().verify(&token), Err(JwtError::Invalid)));
    }

    #[test]
    fn test_verify_garbage_token() {
        assert!(matches!(
            service().verify("not-a-jwt"),
            Err(JwtError::Invalid)
        ));
        assert!(matches!(service().verify(""), Err(JwtError::Invalid)));
    }

    #[test]
    fn test_failure_modes_are_uniform() {
        let service = service();
        let garbage = service.verify("a.b.c").unwrap_err();
        let tampered = {
            let token = service.issue(1, "x@y.com", Role::TeamMember).unwrap();
            let mut parts: Vec<&str> = token.split('.').collect();
            parts[2] = "AAAAAAAA";
            service.verify(&parts.join(".")).unwrap_err()
        };

        assert_eq!(garbage.to_string(), tampered.to_string());
    }
}
