//! Expansion of document references into projections for responses.
//!
//! Lookups are memoized per request so a list that repeats the same owner or
//! venue hits the store once per distinct id.

use std::collections::HashMap;

use super::dto::{
    EventDto, Populated, ReviewDto, UserContact, UserName, VenueDto, VenueSummary,
};
use crate::domain::{Event, User, UserId, Venue, VenueId};
use crate::error::MarketError;
use crate::store::Stores;

/// Per-request lookup cache over the stores.
#[derive(Debug)]
pub struct Expander<'a> {
    stores: &'a Stores,
    users: HashMap<UserId, Option<User>>,
    venues: HashMap<VenueId, Option<Venue>>,
}

impl<'a> Expander<'a> {
    /// Creates an empty cache over `stores`.
    #[must_use]
    pub fn new(stores: &'a Stores) -> Self {
        Self {
            stores,
            users: HashMap::new(),
            venues: HashMap::new(),
        }
    }

    async fn user(&mut self, id: UserId) -> Result<Option<User>, MarketError> {
        if let Some(hit) = self.users.get(&id) {
            return Ok(hit.clone());
        }
        let found = self.stores.users.find_user(id).await?;
        self.users.insert(id, found.clone());
        Ok(found)
    }

    async fn venue(&mut self, id: VenueId) -> Result<Option<Venue>, MarketError> {
        if let Some(hit) = self.venues.get(&id) {
            return Ok(hit.clone());
        }
        let found = self.stores.venues.find_venue(id).await?;
        self.venues.insert(id, found.clone());
        Ok(found)
    }

    async fn contact(&mut self, id: UserId) -> Result<Populated<UserId, UserContact>, MarketError> {
        let user = self.user(id).await?;
        Ok(Populated::from_lookup(user.as_ref().map(UserContact::from)))
    }

    async fn review(&mut self, mut review: ReviewDto) -> Result<ReviewDto, MarketError> {
        if let Populated::Id(id) = review.user {
            let user = self.user(id).await?;
            review.user = Populated::from_lookup(user.as_ref().map(UserName::from));
        }
        Ok(review)
    }

    /// Venue for list views: owner as `{_id, name, email}`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Persistence`] on store failure.
    pub async fn venue_summary(&mut self, venue: Venue) -> Result<VenueDto, MarketError> {
        let owner = self.contact(venue.owner).await?;
        Ok(VenueDto {
            owner,
            ..VenueDto::from(venue)
        })
    }

    /// Venue for the detail view: owner as `{_id, name, email}` and each
    /// review author as `{_id, name}`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Persistence`] on store failure.
    pub async fn venue_detail(&mut self, venue: Venue) -> Result<VenueDto, MarketError> {
        let mut dto = self.venue_summary(venue).await?;
        let mut reviews = Vec::with_capacity(dto.reviews.len());
        for review in std::mem::take(&mut dto.reviews) {
            reviews.push(self.review(review).await?);
        }
        dto.reviews = reviews;
        Ok(dto)
    }

    /// Event for list views: organizer as `{_id, name, email}`, venue as
    /// `{_id, name, address}`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Persistence`] on store failure.
    pub async fn event_summary(&mut self, event: Event) -> Result<EventDto, MarketError> {
        let organizer = self.contact(event.organizer).await?;
        let venue = self.venue(event.venue).await?;
        Ok(EventDto {
            organizer,
            venue: Populated::from_lookup(venue.as_ref().map(VenueSummary::brief)),
            ..EventDto::from(event)
        })
    }

    /// Event for the detail view: organizer and attendees as
    /// `{_id, name, email}`, venue with capacity and amenities.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Persistence`] on store failure.
    pub async fn event_detail(&mut self, event: Event) -> Result<EventDto, MarketError> {
        let organizer = self.contact(event.organizer).await?;
        let venue = self.venue(event.venue).await?;
        let mut attendees = Vec::with_capacity(event.attendees.len());
        for id in &event.attendees {
            attendees.push(self.contact(*id).await?);
        }
        Ok(EventDto {
            organizer,
            venue: Populated::from_lookup(venue.as_ref().map(VenueSummary::overview)),
            attendees,
            ..EventDto::from(event)
        })
    }
}

/// Expands a list of venues for list views.
///
/// # Errors
///
/// Returns [`MarketError::Persistence`] on store failure.
pub async fn venue_list(stores: &Stores, venues: Vec<Venue>) -> Result<Vec<VenueDto>, MarketError> {
    let mut expander = Expander::new(stores);
    let mut out = Vec::with_capacity(venues.len());
    for venue in venues {
        out.push(expander.venue_summary(venue).await?);
    }
    Ok(out)
}

/// Expands a list of events for list views.
///
/// # Errors
///
/// Returns [`MarketError::Persistence`] on store failure.
pub async fn event_list(stores: &Stores, events: Vec<Event>) -> Result<Vec<EventDto>, MarketError> {
    let mut expander = Expander::new(stores);
    let mut out = Vec::with_capacity(events.len());
    for event in events {
        out.push(expander.event_summary(event).await?);
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{NewVenue, Profile, Review, Role};

    async fn seeded() -> (Stores, User, Venue) {
        let stores = Stores::in_memory();
        let Ok(alice) = stores
            .users
            .insert_user(User::new(
                "Alice".to_string(),
                "alice@example.com".to_string(),
                "hash".to_string(),
                Profile::for_role(Role::VenueOwner, None, None),
            ))
            .await
        else {
            panic!("insert user failed");
        };
        let mut venue = Venue::new(
            alice.id,
            NewVenue {
                name: "Grand Hall".to_string(),
                address: "1 Main St".to_string(),
                capacity: 100,
                price_per_day: 500.0,
                amenities: vec!["wifi".to_string()],
                availability: true,
                description: None,
            },
            Vec::new(),
        );
        venue.add_review(Review::new(alice.id, 5, "great".to_string()));
        venue.add_review(Review::new(UserId::new(), 3, String::new()));
        let Ok(venue) = stores.venues.insert_venue(venue).await else {
            panic!("insert venue failed");
        };
        (stores, alice, venue)
    }

    #[tokio::test]
    async fn venue_detail_projects_owner_and_review_authors() {
        let (stores, alice, venue) = seeded().await;
        let Ok(dto) = Expander::new(&stores).venue_detail(venue).await else {
            panic!("expand failed");
        };
        let json = serde_json::to_value(&dto).unwrap_or_default();
        assert_eq!(json["owner"]["name"], "Alice");
        assert_eq!(json["owner"]["email"], "alice@example.com");
        assert_eq!(json["owner"]["_id"], alice.id.to_string());
        assert_eq!(json["reviews"][0]["user"]["name"], "Alice");
        assert!(json["reviews"][0]["user"].get("email").is_none());
        assert!(json["reviews"][1]["user"].is_null());
    }

    #[tokio::test]
    async fn venue_list_leaves_review_authors_as_ids() {
        let (stores, alice, venue) = seeded().await;
        let Ok(list) = venue_list(&stores, vec![venue]).await else {
            panic!("expand failed");
        };
        let json = serde_json::to_value(&list).unwrap_or_default();
        assert_eq!(json[0]["owner"]["name"], "Alice");
        assert_eq!(json[0]["reviews"][0]["user"], alice.id.to_string());
    }
}
