//! Marketplace users and their role-specific profiles.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;

/// Role a user registered with. Gates which operations the user may invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Buys tickets and leaves reviews.
    Attendee,
    /// Lists venues and approves events held at them.
    VenueOwner,
    /// Creates events at listed venues.
    Organizer,
}

impl Role {
    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Attendee => "attendee",
            Self::VenueOwner => "venue_owner",
            Self::Organizer => "organizer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Business details supplied by a venue owner at registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VenueDetails {
    /// Trading name of the venue business.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Business address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Organization details supplied by an organizer at registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationDetails {
    /// Name of the organizing company or group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Public website.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// Role together with the profile data that only exists for that role.
///
/// Serialized flat next to the user fields: `{"role": "venue_owner",
/// "venueDetails": {...}}`. Attendees carry no extra data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Profile {
    /// Plain attendee.
    Attendee,
    /// Venue owner with business details.
    VenueOwner {
        /// Business details.
        #[serde(rename = "venueDetails", default)]
        venue_details: VenueDetails,
    },
    /// Event organizer with organization details.
    Organizer {
        /// Organization details.
        #[serde(rename = "organizationDetails", default)]
        organization_details: OrganizationDetails,
    },
}

impl Profile {
    /// Builds the profile for `role`, keeping only the details relevant to it.
    #[must_use]
    pub fn for_role(
        role: Role,
        venue_details: Option<VenueDetails>,
        organization_details: Option<OrganizationDetails>,
    ) -> Self {
        match role {
            Role::Attendee => Self::Attendee,
            Role::VenueOwner => Self::VenueOwner {
                venue_details: venue_details.unwrap_or_default(),
            },
            Role::Organizer => Self::Organizer {
                organization_details: organization_details.unwrap_or_default(),
            },
        }
    }

    /// The role this profile belongs to.
    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::Attendee => Role::Attendee,
            Self::VenueOwner { .. } => Role::VenueOwner,
            Self::Organizer { .. } => Role::Organizer,
        }
    }
}

/// A registered user as persisted in the identity store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier.
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email, unique across users (stored lowercase).
    pub email: String,
    /// Salted password hash, never sent to clients.
    pub password_hash: String,
    /// Role and role-specific profile.
    #[serde(flatten)]
    pub profile: Profile,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user record.
    #[must_use]
    pub fn new(name: String, email: String, password_hash: String, profile: Profile) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            name,
            email,
            password_hash,
            profile,
            created_at: now,
            updated_at: now,
        }
    }

    /// The user's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.profile.role()
    }
}

/// Normalizes an email address for storage and lookup.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
