use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Role, User};

// Errors returned by session-token issuance and verification.
//
// The Display text of the verification variants is exactly what the client
// sees in the 401 body.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No token provided")]
    Missing,
    #[error("Invalid or expired token")]
    Invalid(#[source] jsonwebtoken::errors::Error),
    // Signature was fine but `sub` is not one of our ids
    #[error("Invalid or expired token")]
    InvalidSubject,
    #[error("failed to sign session token: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),
}

/// Session token (JWT) claims as they travel in the `token` cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub iat: u64,
    pub exp: u64,
}

/// What the rest of the app sees once a session token has been verified.
///
/// - `id` is the user id (`sub` promoted to `Uuid`)
/// - the remaining fields are a snapshot taken at login; they are not
///   refreshed if the account changes while the token is alive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Identity {
    pub fn is(&self, role: Role) -> bool {
        self.role == role
    }
}

/// HS256 session-token issuer/verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct SessionService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: u64,
}

impl std::fmt::Debug for SessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("SessionService")
            .field("validation", &self.validation)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl SessionService {
    pub fn new(secret: &[u8], ttl_seconds: u64, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_seconds;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Issue a session token for `user`, valid for the configured TTL.
    pub fn issue(&self, user: &User) -> Result<String, SessionError> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        let claims = SessionClaims {
            sub: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role(),
            iat: now,
            exp: now.saturating_add(self.ttl_seconds),
        };
        self.sign(&claims)
    }

    pub fn sign(&self, claims: &SessionClaims) -> Result<String, SessionError> {
        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, claims, &self.encoding_key).map_err(SessionError::Sign)
    }

    /// Verify signature + expiry, then convert the claims into an `Identity`.
    pub fn verify(&self, token: &str) -> Result<Identity, SessionError> {
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(SessionError::Invalid)?;
        let claims = data.claims;

        let id = Uuid::parse_str(&claims.sub).map_err(|_| SessionError::InvalidSubject)?;

        Ok(Identity {
            id,
            name: claims.name,
            email: claims.email,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DonorProfile, Profile};
    use chrono::Utc;

    const SECRET: &[u8] = b"test-secret-test-secret-test-secret";

    fn user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.org".into(),
            password_hash: "x".into(),
            profile: Profile::Donor(DonorProfile::default()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn issued_token_verifies_to_same_identity() {
        let svc = SessionService::new(SECRET, 3600, 0);
        let user = user();

        let token = svc.issue(&user).unwrap();
        let identity = svc.verify(&token).unwrap();

        assert_eq!(identity.id, user.id);
        assert_eq!(identity.email, "ada@example.org");
        assert_eq!(identity.role, Role::Donor);
    }

    #[test]
    fn oversized_ttl_saturates_instead_of_overflowing() {
        let svc = SessionService::new(SECRET, u64::MAX, 0);
        assert!(svc.issue(&user()).is_ok());
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = SessionService::new(SECRET, 3600, 0);
        let now = Utc::now().timestamp() as u64;
        let token = svc
            .sign(&SessionClaims {
                sub: Uuid::new_v4().to_string(),
                name: "Ada".into(),
                email: "ada@example.org".into(),
                role: Role::Donor,
                iat: now - 7200,
                exp: now - 3600,
            })
            .unwrap();

        let err = svc.verify(&token).unwrap_err();
        assert!(matches!(err, SessionError::Invalid(_)));
        assert_eq!(err.to_string(), "Invalid or expired token");
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let ours = SessionService::new(SECRET, 3600, 0);
        let theirs = SessionService::new(b"another-secret-another-secret-xx", 3600, 0);

        let token = theirs.issue(&user()).unwrap();
        assert!(matches!(ours.verify(&token), Err(SessionError::Invalid(_))));
    }

    #[test]
    fn non_uuid_subject_is_rejected() {
        let svc = SessionService::new(SECRET, 3600, 0);
        let now = Utc::now().timestamp() as u64;
        let token = svc
            .sign(&SessionClaims {
                sub: "64f1c0ffee".into(),
                name: "Ada".into(),
                email: "ada@example.org".into(),
                role: Role::Ngo,
                iat: now,
                exp: now + 60,
            })
            .unwrap();

        assert!(matches!(svc.verify(&token), Err(SessionError::InvalidSubject)));
    }
}
