//! Access control: credentials, password hashing, and request extractors.

pub mod credential;
pub mod extract;
pub mod password;

pub use credential::{Claims, CredentialError, CredentialService};
pub use extract::{CurrentUser, MaybeUser, TOKEN_COOKIE};
pub use password::PasswordHasher;

use crate::domain::{Role, User};
use crate::error::MarketError;

/// Fails with [`MarketError::Forbidden`] unless `user` holds one of `allowed`.
///
/// # Errors
///
/// Returns [`MarketError::Forbidden`] on a role mismatch.
pub fn authorize(user: &User, allowed: &[Role]) -> Result<(), MarketError> {
    if allowed.contains(&user.role()) {
        Ok(())
    } else {
        tracing::warn!(user_id = %user.id, role = %user.role(), "role check failed");
        Err(MarketError::Forbidden("Access denied".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Profile;

    #[test]
    fn authorize_checks_membership() {
        let user = User::new(
            "Bob".to_string(),
            "bob@example.com".to_string(),
            "hash".to_string(),
            Profile::for_role(Role::Organizer, None, None),
        );
        assert!(authorize(&user, &[Role::Organizer]).is_ok());
        assert!(authorize(&user, &[Role::VenueOwner, Role::Organizer]).is_ok());
        assert!(matches!(
            authorize(&user, &[Role::VenueOwner]),
            Err(MarketError::Forbidden(_))
        ));
    }
}
