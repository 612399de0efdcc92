//! Signed session credentials.
//!
//! A credential is an HS256 JWT binding a user id and email. By default it
//! carries no expiry; a lifetime can be configured with `TOKEN_TTL_SECS`.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{User, UserId};
use crate::error::MarketError;

/// Claims embedded in every credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User the credential was issued to.
    pub id: UserId,
    /// Email of that user at issue time.
    pub email: String,
    /// Issued-at (Unix seconds).
    pub iat: i64,
    /// Expiry (Unix seconds), absent for non-expiring credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Reasons a credential is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    /// The credential has expired.
    #[error("token expired")]
    Expired,

    /// The signature does not match.
    #[error("invalid token signature")]
    InvalidSignature,

    /// Not a well-formed credential.
    #[error("malformed token: {0}")]
    Malformed(String),
}

impl From<CredentialError> for MarketError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Expired => Self::Unauthenticated("Token expired".to_string()),
            CredentialError::InvalidSignature | CredentialError::Malformed(_) => {
                Self::Unauthenticated("Invalid token".to_string())
            }
        }
    }
}

/// Issues and verifies credentials with a shared secret.
#[derive(Clone)]
pub struct CredentialService {
    secret: Vec<u8>,
    ttl: Option<Duration>,
}

impl std::fmt::Debug for CredentialService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialService")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl CredentialService {
    /// Creates a service signing with `secret`. A `ttl` of `None` issues
    /// credentials without expiry.
    #[must_use]
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Option<Duration>) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    /// Issues a credential for `user`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Internal`] if the claims cannot be encoded.
    pub fn issue(&self, user: &User) -> Result<String, MarketError> {
        let now = Utc::now().timestamp();
        let exp = self
            .ttl
            .map(|ttl| now.saturating_add(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)));
        let claims = Claims {
            id: user.id,
            email: user.email.clone(),
            iat: now,
            exp,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|e| MarketError::Internal(format!("failed to generate token: {e}")))
    }

    /// Verifies a credential and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns a [`CredentialError`] if the credential is malformed, was
    /// signed with another secret, or has expired.
    pub fn verify(&self, token: &str) -> Result<Claims, CredentialError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        decode::<Claims>(token, &DecodingKey::from_secret(&self.secret), &validation)
            .map(|data| {
                debug!(user_id = %data.claims.id, "credential verified");
                data.claims
            })
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    warn!("credential expired");
                    CredentialError::Expired
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    warn!("credential signature mismatch");
                    CredentialError::InvalidSignature
                }
                _ => {
                    let message = e.to_string();
                    warn!(error = %message, "credential rejected");
                    CredentialError::Malformed(message)
                }
            })
    }
}
