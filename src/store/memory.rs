//! In-memory document store.
//!
//! Each collection is a `RwLock<HashMap<..>>`. Review appends happen under the
//! collection write lock, so concurrent reviews of the same venue are applied
//! one after the other and the rating always matches the stored list.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{EventStore, TicketStore, UserStore, VenueStore};
use crate::domain::{Event, EventId, Review, Ticket, TicketId, User, UserId, Venue, VenueId};
use crate::error::MarketError;

/// Process-local store for all four collections.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<UserId, User>>,
    venues: RwLock<HashMap<VenueId, Venue>>,
    events: RwLock<HashMap<EventId, Event>>,
    tickets: RwLock<HashMap<TicketId, Ticket>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Returns the values matching `keep`, oldest first.
fn sorted_by_creation<T, K, F>(
    map: &HashMap<K, T>,
    keep: F,
    created: fn(&T) -> DateTime<Utc>,
) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    let mut items: Vec<T> = map.values().filter(|item| keep(item)).cloned().collect();
    items.sort_by_key(|item| created(item));
    items
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: User) -> Result<User, MarketError> {
        let mut map = self.users.write().await;
        if map.values().any(|existing| existing.email == user.email) {
            return Err(MarketError::Unprocessable(
                "Email already registered".to_string(),
            ));
        }
        map.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, MarketError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, MarketError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }
}

#[async_trait]
impl VenueStore for MemoryStore {
    async fn insert_venue(&self, venue: Venue) -> Result<Venue, MarketError> {
        self.venues.write().await.insert(venue.id, venue.clone());
        Ok(venue)
    }

    async fn find_venue(&self, id: VenueId) -> Result<Option<Venue>, MarketError> {
        Ok(self.venues.read().await.get(&id).cloned())
    }

    async fn list_venues(&self, owner: Option<UserId>) -> Result<Vec<Venue>, MarketError> {
        let map = self.venues.read().await;
        Ok(sorted_by_creation(
            &map,
            |venue| owner.is_none_or(|owner| venue.owner == owner),
            |venue| venue.created_at,
        ))
    }

    async fn update_venue(&self, venue: Venue) -> Result<Venue, MarketError> {
        let mut map = self.venues.write().await;
        let slot = map
            .get_mut(&venue.id)
            .ok_or_else(|| MarketError::NotFound("Venue not found".to_string()))?;
        *slot = venue.clone();
        Ok(venue)
    }

    async fn append_venue_review(
        &self,
        id: VenueId,
        review: Review,
    ) -> Result<Option<Venue>, MarketError> {
        let mut map = self.venues.write().await;
        Ok(map.get_mut(&id).map(|venue| {
            venue.add_review(review);
            venue.clone()
        }))
    }

    async fn delete_venue(&self, id: VenueId) -> Result<bool, MarketError> {
        Ok(self.venues.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn insert_event(&self, event: Event) -> Result<Event, MarketError> {
        self.events.write().await.insert(event.id, event.clone());
        Ok(event)
    }

    async fn find_event(&self, id: EventId) -> Result<Option<Event>, MarketError> {
        Ok(self.events.read().await.get(&id).cloned())
    }

    async fn list_events(&self, organizer: Option<UserId>) -> Result<Vec<Event>, MarketError> {
        let map = self.events.read().await;
        Ok(sorted_by_creation(
            &map,
            |event| organizer.is_none_or(|organizer| event.organizer == organizer),
            |event| event.created_at,
        ))
    }

    async fn update_event(&self, event: Event) -> Result<Event, MarketError> {
        let mut map = self.events.write().await;
        let slot = map
            .get_mut(&event.id)
            .ok_or_else(|| MarketError::NotFound("Event not found".to_string()))?;
        *slot = event.clone();
        Ok(event)
    }

    async fn append_event_review(
        &self,
        id: EventId,
        review: Review,
    ) -> Result<Option<Event>, MarketError> {
        let mut map = self.events.write().await;
        Ok(map.get_mut(&id).map(|event| {
            event.add_review(review);
            event.clone()
        }))
    }

    async fn delete_event(&self, id: EventId) -> Result<bool, MarketError> {
        Ok(self.events.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl TicketStore for MemoryStore {
    async fn insert_ticket(&self, ticket: Ticket) -> Result<Ticket, MarketError> {
        self.tickets.write().await.insert(ticket.id, ticket.clone());
        Ok(ticket)
    }

    async fn list_tickets(&self) -> Result<Vec<Ticket>, MarketError> {
        let map = self.tickets.read().await;
        Ok(sorted_by_creation(&map, |_| true, |ticket| ticket.created_at))
    }

    async fn list_tickets_for_user(&self, user: UserId) -> Result<Vec<Ticket>, MarketError> {
        let map = self.tickets.read().await;
        Ok(sorted_by_creation(
            &map,
            |ticket| ticket.user_id == user,
            |ticket| ticket.created_at,
        ))
    }

    async fn delete_ticket(&self, id: TicketId) -> Result<bool, MarketError> {
        Ok(self.tickets.write().await.remove(&id).is_some())
    }
}
