//! Identity service: registration, login, and credential resolution.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::auth::{CredentialService, PasswordHasher};
use crate::domain::user::normalize_email;
use crate::domain::{OrganizationDetails, Profile, Role, User, VenueDetails};
use crate::error::MarketError;
use crate::store::UserStore;

/// Request body for `POST /register`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Login email.
    #[serde(default)]
    pub email: Option<String>,
    /// Plain-text password, hashed before storage.
    #[serde(default)]
    pub password: Option<String>,
    /// One of `attendee`, `venue_owner`, `organizer`.
    #[serde(default)]
    pub role: Option<String>,
    /// Kept only when registering as a venue owner.
    #[serde(default)]
    pub venue_details: Option<VenueDetails>,
    /// Kept only when registering as an organizer.
    #[serde(default)]
    pub organization_details: Option<OrganizationDetails>,
}

/// Request body for `POST /login`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// Plain-text password.
    #[serde(default)]
    pub password: String,
}

/// Registers users, checks passwords, and resolves credentials to users.
#[derive(Debug, Clone)]
pub struct IdentityService {
    users: Arc<dyn UserStore>,
    credentials: CredentialService,
    hasher: PasswordHasher,
}

impl IdentityService {
    /// Creates a new `IdentityService`.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStore>,
        credentials: CredentialService,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            users,
            credentials,
            hasher,
        }
    }

    /// Registers a new user. Profile details not matching the role are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Unprocessable`] on a missing or malformed
    /// field, an unknown role, or an email that is already registered.
    pub async fn register(&self, registration: Registration) -> Result<User, MarketError> {
        let name = required(registration.name.as_deref(), "name")?;
        let email = normalize_email(required(registration.email.as_deref(), "email")?);
        if !is_plausible_email(&email) {
            return Err(MarketError::Unprocessable("Invalid email".to_string()));
        }
        let password = registration
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| MarketError::Unprocessable("password is required".to_string()))?;
        let role = parse_role(required(registration.role.as_deref(), "role")?)?;

        let profile = Profile::for_role(
            role,
            registration.venue_details,
            registration.organization_details,
        );
        let password_hash = self.hasher.hash_blocking(password).await?;
        let user = User::new(name.to_string(), email, password_hash, profile);
        let user = self.users.insert_user(user).await?;

        info!(user_id = %user.id, role = %user.role(), "user registered");
        Ok(user)
    }

    /// Checks a password and issues a credential.
    ///
    /// # Errors
    ///
    /// - [`MarketError::NotFound`] if no user has this email.
    /// - [`MarketError::Unauthenticated`] if the password does not match.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), MarketError> {
        let user = self
            .users
            .find_user_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| MarketError::NotFound("User not found".to_string()))?;

        let matches = self
            .hasher
            .verify_blocking(password.to_string(), user.password_hash.clone())
            .await?;
        if !matches {
            warn!(user_id = %user.id, "login rejected: wrong password");
            return Err(MarketError::Unauthenticated("Invalid password".to_string()));
        }

        let token = self.credentials.issue(&user)?;
        info!(user_id = %user.id, "user logged in");
        Ok((user, token))
    }

    /// Resolves an optional credential. No credential yields `None`; an
    /// invalid one is an error.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Unauthenticated`] if the credential is present
    /// but invalid or bound to a user that no longer exists.
    pub async fn profile(&self, credential: Option<&str>) -> Result<Option<User>, MarketError> {
        match credential.filter(|c| !c.is_empty()) {
            Some(token) => self.authenticate(token).await.map(Some),
            None => Ok(None),
        }
    }

    /// Verifies a credential and loads the user it is bound to.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Unauthenticated`] if the credential is invalid
    /// or the user no longer exists.
    pub async fn authenticate(&self, credential: &str) -> Result<User, MarketError> {
        let claims = self.credentials.verify(credential)?;
        self.users.find_user(claims.id).await?.ok_or_else(|| {
            warn!(user_id = %claims.id, "credential bound to missing user");
            MarketError::Unauthenticated("User not found".to_string())
        })
    }
}

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, MarketError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| MarketError::Unprocessable(format!("{field} is required")))
}

fn parse_role(value: &str) -> Result<Role, MarketError> {
    match value {
        "attendee" => Ok(Role::Attendee),
        "venue_owner" => Ok(Role::VenueOwner),
        "organizer" => Ok(Role::Organizer),
        other => Err(MarketError::Unprocessable(format!("Invalid role: {other}"))),
    }
}

fn is_plausible_email(email: &str) -> bool {
    email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::store::Stores;

    fn service() -> IdentityService {
        let Ok(hasher) = PasswordHasher::with_cost(64, 1) else {
            panic!("hasher params rejected");
        };
        IdentityService::new(
            Stores::in_memory().users,
            CredentialService::new("test-secret", None),
            hasher,
        )
    }

    fn registration(role: &str) -> Registration {
        Registration {
            name: Some("Alice".to_string()),
            email: Some("Alice@Example.com".to_string()),
            password: Some("s3cret".to_string()),
            role: Some(role.to_string()),
            venue_details: Some(VenueDetails {
                business_name: Some("Hall Co".to_string()),
                ..VenueDetails::default()
            }),
            organization_details: Some(OrganizationDetails::default()),
        }
    }

    #[tokio::test]
    async fn register_keeps_only_role_details() {
        let svc = service();
        let Ok(user) = svc.register(registration("venue_owner")).await else {
            panic!("registration failed");
        };
        assert_eq!(user.email, "alice@example.com");
        assert!(matches!(user.profile, Profile::VenueOwner { .. }));
        assert!(user.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn register_rejects_duplicates_and_bad_input() {
        let svc = service();
        assert!(svc.register(registration("attendee")).await.is_ok());
        assert!(matches!(
            svc.register(registration("attendee")).await,
            Err(MarketError::Unprocessable(_))
        ));
        assert!(matches!(
            svc.register(registration("admin")).await,
            Err(MarketError::Unprocessable(_))
        ));
        let mut missing = registration("attendee");
        missing.email = Some("bob@example.com".to_string());
        missing.password = None;
        assert!(matches!(
            svc.register(missing).await,
            Err(MarketError::Unprocessable(_))
        ));
        let mut bad_email = registration("attendee");
        bad_email.email = Some("not-an-email".to_string());
        assert!(matches!(
            svc.register(bad_email).await,
            Err(MarketError::Unprocessable(_))
        ));
    }

    #[tokio::test]
    async fn login_distinguishes_unknown_email_and_wrong_password() {
        let svc = service();
        let _ = svc.register(registration("organizer")).await;

        assert!(matches!(
            svc.login("nobody@example.com", "s3cret").await,
            Err(MarketError::NotFound(_))
        ));
        assert!(matches!(
            svc.login("alice@example.com", "wrong").await,
            Err(MarketError::Unauthenticated(_))
        ));
        let Ok((user, token)) = svc.login("ALICE@example.com", "s3cret").await else {
            panic!("login failed");
        };
        let Ok(Some(resolved)) = svc.profile(Some(&token)).await else {
            panic!("profile failed");
        };
        assert_eq!(resolved.id, user.id);
        assert_eq!(resolved.role(), Role::Organizer);
    }

    #[tokio::test]
    async fn profile_without_credential_is_none() {
        let svc = service();
        assert!(matches!(svc.profile(None).await, Ok(None)));
        assert!(matches!(svc.profile(Some("")).await, Ok(None)));
        assert!(matches!(
            svc.profile(Some("garbage")).await,
            Err(MarketError::Unauthenticated(_))
        ));
    }

    #[tokio::test]
    async fn credential_for_missing_user_is_rejected() {
        let svc = service();
        let ghost = User::new(
            "Ghost".to_string(),
            "ghost@example.com".to_string(),
            "hash".to_string(),
            Profile::Attendee,
        );
        let Ok(token) = CredentialService::new("test-secret", None).issue(&ghost) else {
            panic!("issue failed");
        };
        assert!(matches!(
            svc.authenticate(&token).await,
            Err(MarketError::Unauthenticated(_))
        ));
    }
}
