//! User DTOs for registration, login, and profile responses.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{OrganizationDetails, Profile, Role, User, UserId, VenueDetails};

/// A user as returned by `POST /register` and `POST /login`. The password
/// hash is never included.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    /// User id.
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Registered role.
    pub role: Role,
    /// Present for venue owners.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue_details: Option<VenueDetails>,
    /// Present for organizers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_details: Option<OrganizationDetails>,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        let role = user.role();
        let (venue_details, organization_details) = match user.profile {
            Profile::Attendee => (None, None),
            Profile::VenueOwner { venue_details } => (Some(venue_details), None),
            Profile::Organizer {
                organization_details,
            } => (None, Some(organization_details)),
        };
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role,
            venue_details,
            organization_details,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Response body for `GET /profile`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfileDto {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// User id.
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Registered role.
    pub role: Role,
}

impl From<User> for ProfileDto {
    fn from(user: User) -> Self {
        Self {
            role: user.role(),
            name: user.name,
            email: user.email,
            id: user.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_dto_omits_password_hash() {
        let user = User::new(
            "Alice".to_string(),
            "alice@example.com".to_string(),
            "$argon2id$v=19$m=19456,t=2,p=1$salt$digest".to_string(),
            Profile::for_role(Role::VenueOwner, None, None),
        );
        let json = serde_json::to_value(UserDto::from(user)).unwrap_or_default();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "venue_owner");
        assert!(json["venueDetails"].is_object());
        assert!(json.get("organizationDetails").is_none());
    }
}
