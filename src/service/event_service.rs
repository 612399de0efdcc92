//! Event service: creation with booking checks, status workflow, reviews.
//!
//! Creation reads the venue and then writes the event without holding a
//! lock across both steps. Two organizers booking the same venue at the same
//! time are each checked against the venue as it was when they read it.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate};
use tracing::{info, warn};

use super::form::{FormFields, whole_count};
use super::validate_rating;
use crate::auth::authorize;
use crate::domain::event::check_booking;
use crate::domain::{
    BookingViolation, Event, EventId, NewEvent, Review, Role, User, VenueId,
};
use crate::error::MarketError;
use crate::store::{EventStore, ImageStore, ImageUpload, VenueStore};

/// Fields an event form must carry, in reporting order.
pub const REQUIRED_EVENT_FIELDS: [&str; 9] = [
    "title",
    "description",
    "venue",
    "eventDate",
    "eventTime",
    "expectedAttendees",
    "budget",
    "category",
    "price",
];

impl From<BookingViolation> for MarketError {
    fn from(violation: BookingViolation) -> Self {
        match violation {
            BookingViolation::VenueUnavailable => Self::validation_with(
                "Venue not available",
                "This venue is currently unavailable",
            ),
            BookingViolation::CapacityExceeded { expected, capacity } => Self::validation_with(
                "Capacity exceeded",
                format!("Expected attendees ({expected}) exceed venue capacity ({capacity})"),
            ),
            BookingViolation::InsufficientBudget { budget, cost } => Self::validation_with(
                "Insufficient budget",
                format!("Budget ({budget}) is insufficient for venue cost ({cost})"),
            ),
        }
    }
}

/// Coordinates event rules across the event, venue, and image stores.
#[derive(Debug, Clone)]
pub struct EventService {
    events: Arc<dyn EventStore>,
    venues: Arc<dyn VenueStore>,
    images: Arc<dyn ImageStore>,
}

impl EventService {
    /// Creates a new `EventService`.
    #[must_use]
    pub fn new(
        events: Arc<dyn EventStore>,
        venues: Arc<dyn VenueStore>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            events,
            venues,
            images,
        }
    }

    /// Creates an event at a listed venue after checking availability,
    /// capacity, and budget, in that order. Images are stored only once every
    /// check has passed.
    ///
    /// # Errors
    ///
    /// - [`MarketError::Forbidden`] unless `organizer` is an organizer.
    /// - [`MarketError::Validation`] listing every missing field, or naming
    ///   the booking rule the venue violates.
    /// - [`MarketError::NotFound`] if the venue does not exist.
    pub async fn create_event(
        &self,
        organizer: &User,
        form: &FormFields,
        images: Vec<ImageUpload>,
    ) -> Result<Event, MarketError> {
        authorize(organizer, &[Role::Organizer])?;
        let input = parse_new_event(form)?;

        let venue = self
            .venues
            .find_venue(input.venue)
            .await?
            .ok_or_else(|| MarketError::NotFound("Venue not found".to_string()))?;
        if let Err(violation) = check_booking(&venue, input.expected_attendees, input.budget) {
            warn!(venue_id = %venue.id, ?violation, "event booking rejected");
            return Err(violation.into());
        }

        let images = self.images.save_all(images).await?;
        let event = self
            .events
            .insert_event(Event::new(organizer.id, input, images))
            .await?;
        info!(event_id = %event.id, venue_id = %event.venue, organizer = %organizer.id, "event created");
        Ok(event)
    }

    /// Lists events. With `mine`, only the caller's events are returned.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Unauthenticated`] if `mine` is set without a
    /// caller.
    pub async fn list_events(
        &self,
        caller: Option<&User>,
        mine: bool,
    ) -> Result<Vec<Event>, MarketError> {
        let organizer = if mine {
            let caller = caller.ok_or_else(|| {
                MarketError::Unauthenticated("Authentication required".to_string())
            })?;
            Some(caller.id)
        } else {
            None
        };
        self.events.list_events(organizer).await
    }

    /// Loads an event, `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Persistence`] on store failure.
    pub async fn get_event(&self, id: EventId) -> Result<Option<Event>, MarketError> {
        self.events.find_event(id).await
    }

    /// Sets the workflow status. Only the owner of the event's venue may do
    /// this; any non-empty status string is accepted.
    ///
    /// # Errors
    ///
    /// - [`MarketError::Forbidden`] unless the caller owns the venue.
    /// - [`MarketError::NotFound`] if the event or its venue does not exist.
    /// - [`MarketError::Validation`] if no status is given.
    pub async fn set_status(
        &self,
        caller: &User,
        id: EventId,
        status: Option<String>,
    ) -> Result<Event, MarketError> {
        authorize(caller, &[Role::VenueOwner])?;
        let status = status
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| MarketError::validation("Missing status"))?;

        let mut event = self
            .events
            .find_event(id)
            .await?
            .ok_or_else(|| MarketError::NotFound("Event not found".to_string()))?;
        let venue = self
            .venues
            .find_venue(event.venue)
            .await?
            .ok_or_else(|| MarketError::NotFound("Venue not found".to_string()))?;
        if !venue.is_owned_by(caller.id) {
            warn!(event_id = %id, caller = %caller.id, "event status change rejected");
            return Err(MarketError::Forbidden("Not authorized".to_string()));
        }

        event.set_status(status);
        let event = self.events.update_event(event).await?;
        info!(event_id = %id, status = %event.status, "event status changed");
        Ok(event)
    }

    /// Appends a review from `author`. Events keep no aggregate rating.
    ///
    /// # Errors
    ///
    /// - [`MarketError::Validation`] if the rating is missing, fractional, or out of range.
    /// - [`MarketError::NotFound`] if the event does not exist.
    pub async fn add_review(
        &self,
        author: &User,
        id: EventId,
        rating: Option<f64>,
        comment: Option<String>,
    ) -> Result<Event, MarketError> {
        let rating = validate_rating(rating)?;
        let review = Review::new(author.id, rating, comment.unwrap_or_default());
        let event = self
            .events
            .append_event_review(id, review)
            .await?
            .ok_or_else(|| MarketError::NotFound("Event not found".to_string()))?;
        info!(event_id = %id, rating, "event reviewed");
        Ok(event)
    }

    /// Removes an event created by the caller.
    ///
    /// # Errors
    ///
    /// - [`MarketError::Forbidden`] unless the caller organized the event.
    /// - [`MarketError::NotFound`] if the event does not exist.
    pub async fn delete_event(&self, caller: &User, id: EventId) -> Result<(), MarketError> {
        authorize(caller, &[Role::Organizer])?;
        let event = self
            .events
            .find_event(id)
            .await?
            .ok_or_else(|| MarketError::NotFound("Event not found".to_string()))?;
        if event.organizer != caller.id {
            warn!(event_id = %id, caller = %caller.id, "event deletion rejected");
            return Err(MarketError::Forbidden("Not authorized".to_string()));
        }
        if !self.events.delete_event(id).await? {
            return Err(MarketError::NotFound("Event not found".to_string()));
        }
        info!(event_id = %id, "event deleted");
        Ok(())
    }
}

/// Builds event input from form fields. `date` and `time` are accepted as
/// aliases of `eventDate` and `eventTime`.
///
/// # Errors
///
/// Returns [`MarketError::Validation`] listing every missing field, or on a
/// malformed venue id, date, or attendee count.
pub fn parse_new_event(form: &FormFields) -> Result<NewEvent, MarketError> {
    let title = form.text("title");
    let description = form.text("description");
    let venue = form.text("venue");
    let event_date = form.text_any(&["date", "eventDate"]);
    let event_time = form.text_any(&["time", "eventTime"]);
    let expected_attendees = form.positive_number("expectedAttendees");
    let budget = form.positive_number("budget");
    let category = form.text("category");
    let price = form.positive_number("price");

    let present = [
        title.is_some(),
        description.is_some(),
        venue.is_some(),
        event_date.is_some(),
        event_time.is_some(),
        expected_attendees.is_some(),
        budget.is_some(),
        category.is_some(),
        price.is_some(),
    ];
    let missing: Vec<&str> = REQUIRED_EVENT_FIELDS
        .iter()
        .zip(present)
        .filter(|(_, ok)| !ok)
        .map(|(field, _)| *field)
        .collect();

    let (
        Some(title),
        Some(description),
        Some(venue),
        Some(event_date),
        Some(event_time),
        Some(expected_attendees),
        Some(budget),
        Some(category),
        Some(price),
    ) = (
        title,
        description,
        venue,
        event_date,
        event_time,
        expected_attendees,
        budget,
        category,
        price,
    )
    else {
        return Err(MarketError::validation_with(
            "Missing required fields",
            format!("Please fill in the following fields: {}", missing.join(", ")),
        ));
    };

    let venue = venue
        .parse::<VenueId>()
        .map_err(|_| MarketError::validation("Invalid venue id"))?;
    let event_date = parse_event_date(event_date)
        .ok_or_else(|| MarketError::validation("Invalid event date"))?;
    let expected_attendees = whole_count(expected_attendees).ok_or_else(|| {
        MarketError::validation_with(
            "Invalid expected attendees",
            "Expected attendees must be a whole number",
        )
    })?;

    Ok(NewEvent {
        title: title.to_string(),
        description: description.to_string(),
        venue,
        event_date,
        event_time: event_time.to_string(),
        expected_attendees,
        budget,
        category: category.to_string(),
        price,
    })
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{NewVenue, Profile, Venue};
    use crate::store::{DiskImageStore, Stores};

    struct Fixture {
        svc: EventService,
        stores: Stores,
        _dir: tempfile::TempDir,
    }

    fn user(role: Role) -> User {
        User::new(
            "Bob".to_string(),
            format!("{role}@example.com"),
            "hash".to_string(),
            Profile::for_role(role, None, None),
        )
    }

    fn fixture() -> Fixture {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let stores = Stores::in_memory();
        let svc = EventService::new(
            Arc::clone(&stores.events),
            Arc::clone(&stores.venues),
            Arc::new(DiskImageStore::new(dir.path())),
        );
        Fixture {
            svc,
            stores,
            _dir: dir,
        }
    }

    async fn listed_venue(fx: &Fixture, owner: &User, available: bool) -> Venue {
        let venue = Venue::new(
            owner.id,
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
        );
        let Ok(venue) = fx.stores.venues.insert_venue(venue).await else {
            panic!("insert venue failed");
        };
        venue
    }

    fn event_form(venue: VenueId, attendees: &str, budget: &str) -> FormFields {
        let venue = venue.to_string();
        [
            ("title", "Launch"),
            ("description", "Product launch"),
            ("venue", venue.as_str()),
            ("date", "2026-05-01"),
            ("time", "18:00"),
            ("expectedAttendees", attendees),
            ("budget", budget),
            ("category", "business"),
            ("price", "20"),
        ]
        .into_iter()
        .collect()
    }

    fn validation_message(result: Result<Event, MarketError>) -> String {
        match result {
            Err(MarketError::Validation { message, .. }) => message,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn missing_fields_are_all_listed_in_order() {
        let form: FormFields = [("title", "Launch"), ("budget", "0"), ("time", "18:00")]
            .into_iter()
            .collect();
        let Err(MarketError::Validation { message, details }) = parse_new_event(&form) else {
            panic!("expected validation error");
        };
        assert_eq!(message, "Missing required fields");
        assert_eq!(
            details.as_deref(),
            Some(
                "Please fill in the following fields: description, venue, eventDate, \
                 expectedAttendees, budget, category, price"
            )
        );
    }

    #[test]
    fn event_date_formats() {
        assert_eq!(
            parse_event_date("2026-05-01"),
            NaiveDate::from_ymd_opt(2026, 5, 1)
        );
        assert_eq!(
            parse_event_date("2026-05-01T18:00:00Z"),
            NaiveDate::from_ymd_opt(2026, 5, 1)
        );
        assert_eq!(parse_event_date("May 1st"), None);
    }

    #[tokio::test]
    async fn booking_scenario() {
        let fx = fixture();
        let alice = user(Role::VenueOwner);
        let bob = user(Role::Organizer);
        let venue = listed_venue(&fx, &alice, true).await;

        let Ok(event) = fx
            .svc
            .create_event(&bob, &event_form(venue.id, "50", "600"), Vec::new())
            .await
        else {
            panic!("valid event rejected");
        };
        assert_eq!(event.status, "pending");
        assert_eq!(event.organizer, bob.id);

        let over = fx
            .svc
            .create_event(&bob, &event_form(venue.id, "150", "600"), Vec::new())
            .await;
        assert_eq!(validation_message(over), "Capacity exceeded");

        let poor = fx
            .svc
            .create_event(&bob, &event_form(venue.id, "50", "100"), Vec::new())
            .await;
        assert_eq!(validation_message(poor), "Insufficient budget");

        let mut closed = venue.clone();
        closed.set_availability(false);
        let _ = fx.stores.venues.update_venue(closed).await;
        let unavailable = fx
            .svc
            .create_event(&bob, &event_form(venue.id, "50", "600"), Vec::new())
            .await;
        assert_eq!(validation_message(unavailable), "Venue not available");

        assert_eq!(fx.svc.list_events(None, false).await.map(|e| e.len()).ok(), Some(1));
    }

    #[tokio::test]
    async fn unknown_venue_is_not_found_and_role_is_checked() {
        let fx = fixture();
        let bob = user(Role::Organizer);
        assert!(matches!(
            fx.svc
                .create_event(&bob, &event_form(VenueId::new(), "50", "600"), Vec::new())
                .await,
            Err(MarketError::NotFound(_))
        ));
        let dave = user(Role::Attendee);
        assert!(matches!(
            fx.svc
                .create_event(&dave, &event_form(VenueId::new(), "50", "600"), Vec::new())
                .await,
            Err(MarketError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn status_is_set_by_venue_owner_only() {
        let fx = fixture();
        let alice = user(Role::VenueOwner);
        let carol = user(Role::VenueOwner);
        let bob = user(Role::Organizer);
        let venue = listed_venue(&fx, &alice, true).await;
        let Ok(event) = fx
            .svc
            .create_event(&bob, &event_form(venue.id, "50", "600"), Vec::new())
            .await
        else {
            panic!("create failed");
        };

        assert!(matches!(
            fx.svc
                .set_status(&carol, event.id, Some("approved".to_string()))
                .await,
            Err(MarketError::Forbidden(_))
        ));
        assert!(matches!(
            fx.svc
                .set_status(&alice, EventId::new(), Some("approved".to_string()))
                .await,
            Err(MarketError::NotFound(_))
        ));
        let Ok(updated) = fx
            .svc
            .set_status(&alice, event.id, Some("anything goes".to_string()))
            .await
        else {
            panic!("status update failed");
        };
        assert_eq!(updated.status, "anything goes");
    }

    #[tokio::test]
    async fn reviews_and_deletion() {
        let fx = fixture();
        let alice = user(Role::VenueOwner);
        let bob = user(Role::Organizer);
        let other = user(Role::Organizer);
        let venue = listed_venue(&fx, &alice, true).await;
        let Ok(event) = fx
            .svc
            .create_event(&bob, &event_form(venue.id, "50", "600"), Vec::new())
            .await
        else {
            panic!("create failed");
        };

        let Ok(reviewed) = fx.svc.add_review(&alice, event.id, Some(4.0), None).await else {
            panic!("review failed");
        };
        assert_eq!(reviewed.reviews.len(), 1);
        assert!(matches!(
            fx.svc.add_review(&alice, event.id, None, None).await,
            Err(MarketError::Validation { .. })
        ));

        assert_eq!(
            fx.svc.list_events(Some(&other), true).await.map(|e| e.len()).ok(),
            Some(0)
        );
        assert!(matches!(
            fx.svc.delete_event(&other, event.id).await,
            Err(MarketError::Forbidden(_))
        ));
        assert!(fx.svc.delete_event(&bob, event.id).await.is_ok());
        assert!(matches!(
            fx.svc.delete_event(&bob, event.id).await,
            Err(MarketError::NotFound(_))
        ));
    }
}
