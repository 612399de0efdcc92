//! Venue DTOs for create, list, detail, availability, and review operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::{Populated, ReviewDto, UserContact};
use crate::domain::{UserId, Venue, VenueId};
use crate::service::lenient;

/// Multipart form for `POST /venues`. Documentation only; the handler reads
/// the parts directly.
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct VenueForm {
    /// Venue name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Maximum attendees, a positive whole number.
    pub capacity: String,
    /// Rental price for one day, a positive number.
    pub price_per_day: String,
    /// JSON array of strings, e.g. `["wifi","parking"]`.
    pub amenities: Option<String>,
    /// `"true"` to accept events right away.
    pub availability: Option<String>,
    /// Optional description.
    pub description: Option<String>,
    /// Up to the configured number of image files.
    #[schema(value_type = Vec<String>, format = Binary)]
    pub images: Vec<Vec<u8>>,
}

/// A venue as rendered in responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VenueDto {
    /// Venue id.
    #[serde(rename = "_id")]
    pub id: VenueId,
    /// Owner id, or `{_id, name, email}` on list and detail views.
    #[schema(value_type = Object)]
    pub owner: Populated<UserId, UserContact>,
    /// Venue name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Maximum attendees.
    pub capacity: u32,
    /// Rental price for one day.
    pub price_per_day: f64,
    /// Amenities offered.
    pub amenities: Vec<String>,
    /// Whether the venue accepts new events.
    pub availability: bool,
    /// Stored image paths.
    pub images: Vec<String>,
    /// Mean review rating, 0 before the first review.
    pub rating: f64,
    /// Reviews in insertion order.
    pub reviews: Vec<ReviewDto>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<Venue> for VenueDto {
    fn from(venue: Venue) -> Self {
        Self {
            id: venue.id,
            owner: Populated::Id(venue.owner),
            name: venue.name,
            address: venue.address,
            description: venue.description,
            capacity: venue.capacity,
            price_per_day: venue.price_per_day,
            amenities: venue.amenities,
            availability: venue.availability,
            images: venue.images,
            rating: venue.rating,
            reviews: venue.reviews.into_iter().map(ReviewDto::from).collect(),
            created_at: venue.created_at,
            updated_at: venue.updated_at,
        }
    }
}

/// Query parameters for `GET /venues`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct VenueListQuery {
    /// `true` to list only the caller's venues.
    pub owner: Option<String>,
}

impl VenueListQuery {
    /// Returns `true` when only the caller's venues are requested.
    #[must_use]
    pub fn mine(&self) -> bool {
        self.owner.as_deref() == Some("true")
    }
}

/// Request body for `PUT /venues/:id/availability`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AvailabilityRequest {
    /// New availability flag. `"true"` and `"false"` are accepted as well.
    #[serde(default, deserialize_with = "lenient::flag")]
    pub availability: Option<bool>,
}
