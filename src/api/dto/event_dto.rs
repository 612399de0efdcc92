//! Event DTOs for create, list, detail, status, and review operations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::{Populated, ReviewDto, UserContact};
use crate::domain::{Event, EventId, UserId, Venue, VenueId};

/// Multipart form for `POST /events`. Documentation only; the handler reads
/// the parts directly. `date` and `time` are accepted in place of
/// `eventDate` and `eventTime`.
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct EventForm {
    /// Event title.
    pub title: String,
    /// Event description.
    pub description: String,
    /// Venue id.
    pub venue: String,
    /// `YYYY-MM-DD`.
    pub event_date: String,
    /// Start time, e.g. `18:30`.
    pub event_time: String,
    /// Expected attendees, a positive whole number.
    pub expected_attendees: String,
    /// Budget for the venue, a positive number.
    pub budget: String,
    /// Free-form category.
    pub category: String,
    /// Ticket price, a positive number.
    pub price: String,
    /// Up to the configured number of image files.
    #[schema(value_type = Vec<String>, format = Binary)]
    pub images: Vec<Vec<u8>>,
}

/// Venue projection embedded in events. `capacity` and `amenities` appear
/// on the detail view only.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct VenueSummary {
    /// Venue id.
    #[serde(rename = "_id")]
    pub id: VenueId,
    /// Venue name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Maximum attendees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    /// Amenities offered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Vec<String>>,
}

impl VenueSummary {
    /// Name and address only.
    #[must_use]
    pub fn brief(venue: &Venue) -> Self {
        Self {
            id: venue.id,
            name: venue.name.clone(),
            address: venue.address.clone(),
            capacity: None,
            amenities: None,
        }
    }

    /// Name, address, capacity, and amenities.
    #[must_use]
    pub fn overview(venue: &Venue) -> Self {
        Self {
            capacity: Some(venue.capacity),
            amenities: Some(venue.amenities.clone()),
            ..Self::brief(venue)
        }
    }
}

/// An event as rendered in responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventDto {
    /// Event id.
    #[serde(rename = "_id")]
    pub id: EventId,
    /// Organizer id, or `{_id, name, email}` on list and detail views.
    #[schema(value_type = Object)]
    pub organizer: Populated<UserId, UserContact>,
    /// Venue id, or a venue projection on list and detail views.
    #[schema(value_type = Object)]
    pub venue: Populated<VenueId, VenueSummary>,
    /// Event title.
    pub title: String,
    /// Event description.
    pub description: String,
    /// Calendar date.
    pub event_date: NaiveDate,
    /// Start time.
    pub event_time: String,
    /// Expected attendees.
    pub expected_attendees: u32,
    /// Budget for the venue.
    pub budget: f64,
    /// Free-form category.
    pub category: String,
    /// Ticket price.
    pub price: f64,
    /// Workflow status, `pending` until the venue owner changes it.
    pub status: String,
    /// Stored image paths.
    pub images: Vec<String>,
    /// Attendee ids, or `{_id, name, email}` on the detail view.
    #[schema(value_type = Vec<Object>)]
    pub attendees: Vec<Populated<UserId, UserContact>>,
    /// Reviews in insertion order.
    pub reviews: Vec<ReviewDto>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<Event> for EventDto {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            organizer: Populated::Id(event.organizer),
            venue: Populated::Id(event.venue),
            title: event.title,
            description: event.description,
            event_date: event.event_date,
            event_time: event.event_time,
            expected_attendees: event.expected_attendees,
            budget: event.budget,
            category: event.category,
            price: event.price,
            status: event.status,
            images: event.images,
            attendees: event.attendees.into_iter().map(Populated::Id).collect(),
            reviews: event.reviews.into_iter().map(ReviewDto::from).collect(),
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

/// Query parameters for `GET /events`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct EventListQuery {
    /// `true` to list only the caller's events.
    pub organizer: Option<String>,
}

impl EventListQuery {
    /// Returns `true` when only the caller's events are requested.
    #[must_use]
    pub fn mine(&self) -> bool {
        self.organizer.as_deref() == Some("true")
    }
}

/// Request body for `PUT /events/:id/status`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StatusRequest {
    /// New workflow status. Any non-empty string.
    #[serde(default)]
    pub status: Option<String>,
}
