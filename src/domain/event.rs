//! Events organized at venues, and the booking constraints checked
//! against the venue when an event is created.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::review::Review;
use super::venue::Venue;
use super::{EventId, UserId, VenueId};

/// Status assigned to every new event until the venue owner changes it.
pub const DEFAULT_EVENT_STATUS: &str = "pending";

/// Number of days an event books its venue for.
pub const EVENT_DURATION_DAYS: f64 = 1.0;

/// Validated input for a new event.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    /// Event title.
    pub title: String,
    /// Event description.
    pub description: String,
    /// Venue the event is held at.
    pub venue: VenueId,
    /// Calendar date of the event.
    pub event_date: NaiveDate,
    /// Start time as entered by the organizer (e.g. `"18:30"`).
    pub event_time: String,
    /// Number of attendees the organizer expects.
    pub expected_attendees: u32,
    /// Organizer budget for the venue.
    pub budget: f64,
    /// Free-form category.
    pub category: String,
    /// Ticket price.
    pub price: f64,
}

/// An event as persisted in the event store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique identifier.
    #[serde(rename = "_id")]
    pub id: EventId,
    /// Organizer who created the event.
    pub organizer: UserId,
    /// Venue the event is held at.
    pub venue: VenueId,
    /// Event title.
    pub title: String,
    /// Event description.
    pub description: String,
    /// Calendar date of the event.
    pub event_date: NaiveDate,
    /// Start time.
    pub event_time: String,
    /// Number of attendees the organizer expects.
    pub expected_attendees: u32,
    /// Organizer budget for the venue.
    pub budget: f64,
    /// Free-form category.
    pub category: String,
    /// Ticket price.
    pub price: f64,
    /// Workflow state, set by the venue owner. Any string is accepted.
    pub status: String,
    /// Stored image references.
    #[serde(default)]
    pub images: Vec<String>,
    /// Registered attendees.
    #[serde(default)]
    pub attendees: Vec<UserId>,
    /// Reviews in insertion order. No aggregate rating is kept for events.
    #[serde(default)]
    pub reviews: Vec<Review>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Creates a pending event organized by `organizer`.
    #[must_use]
    pub fn new(organizer: UserId, input: NewEvent, images: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: EventId::new(),
            organizer,
            venue: input.venue,
            title: input.title,
            description: input.description,
            event_date: input.event_date,
            event_time: input.event_time,
            expected_attendees: input.expected_attendees,
            budget: input.budget,
            category: input.category,
            price: input.price,
            status: DEFAULT_EVENT_STATUS.to_string(),
            images,
            attendees: Vec::new(),
            reviews: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a review. Unlike venues, no average is recomputed.
    pub fn add_review(&mut self, review: Review) {
        self.reviews.push(review);
        self.updated_at = Utc::now();
    }

    /// Replaces the workflow status.
    pub fn set_status(&mut self, status: String) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

/// Reason a venue cannot host a proposed event.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingViolation {
    /// The venue owner has marked the venue unavailable.
    VenueUnavailable,
    /// More attendees expected than the venue holds.
    CapacityExceeded {
        /// Attendees the organizer expects.
        expected: u32,
        /// Venue capacity.
        capacity: u32,
    },
    /// Budget does not cover the venue rental.
    InsufficientBudget {
        /// Organizer budget.
        budget: f64,
        /// Venue cost for the event duration.
        cost: f64,
    },
}

/// Checks a proposed event against the venue, in the order availability,
/// capacity, budget. Returns the first violation found.
///
/// # Errors
///
/// Returns the [`BookingViolation`] that prevents the booking.
pub fn check_booking(
    venue: &Venue,
    expected_attendees: u32,
    budget: f64,
) -> Result<(), BookingViolation> {
    if !venue.availability {
        return Err(BookingViolation::VenueUnavailable);
    }
    if expected_attendees > venue.capacity {
        return Err(BookingViolation::CapacityExceeded {
            expected: expected_attendees,
            capacity: venue.capacity,
        });
    }
    let cost = venue.price_per_day * EVENT_DURATION_DAYS;
    if budget < cost {
        return Err(BookingViolation::InsufficientBudget { budget, cost });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::venue::NewVenue;

    fn venue(available: bool) -> Venue {
        Venue::new(
            UserId::new(),
            NewVenue {
                name: "Grand Hall".to_string(),
                address: "1 Main St".to_string(),
                capacity: 100,
                price_per_day: 500.0,
                amenities: Vec::new(),
                availability: available,
                description: None,
            },
            Vec::new(),
        )
    }

    #[test]
    fn accepts_event_within_limits() {
        assert_eq!(check_booking(&venue(true), 50, 600.0), Ok(()));
        assert_eq!(check_booking(&venue(true), 100, 500.0), Ok(()));
    }

    #[test]
    fn rejects_unavailable_venue_first() {
        assert_eq!(
            check_booking(&venue(false), 500, 1.0),
            Err(BookingViolation::VenueUnavailable)
        );
    }

    #[test]
    fn rejects_over_capacity() {
        assert_eq!(
            check_booking(&venue(true), 150, 600.0),
            Err(BookingViolation::CapacityExceeded {
                expected: 150,
                capacity: 100
            })
        );
    }

    #[test]
    fn rejects_short_budget() {
        assert_eq!(
            check_booking(&venue(true), 50, 100.0),
            Err(BookingViolation::InsufficientBudget {
                budget: 100.0,
                cost: 500.0
            })
        );
    }

    #[test]
    fn event_reviews_do_not_change_other_fields() {
        let mut event = Event::new(
            UserId::new(),
            NewEvent {
                title: "Launch".to_string(),
                description: "Product launch".to_string(),
                venue: VenueId::new(),
                event_date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap_or_default(),
                event_time: "18:00".to_string(),
                expected_attendees: 50,
                budget: 600.0,
                category: "business".to_string(),
                price: 20.0,
            },
            Vec::new(),
        );
        assert_eq!(event.status, DEFAULT_EVENT_STATUS);
        event.add_review(Review::new(UserId::new(), 4, "good".to_string()));
        assert_eq!(event.reviews.len(), 1);
        assert_eq!(event.status, DEFAULT_EVENT_STATUS);
    }
}
