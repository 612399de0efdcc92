//! Document stores for users, venues, events, and tickets, plus image storage.
//!
//! Each collection is behind an object-safe trait so handlers hold
//! `Arc<dyn ...>` and the backend is chosen at startup:
//!
//! - [`MemoryStore`]: process-local maps, used by default and in tests.
//! - [`PostgresStore`]: JSONB documents in PostgreSQL via `sqlx`.
//!
//! Review appends are the only read-modify-write the stores expose; both
//! backends serialize them per document so the persisted review list always
//! matches the rating computed from it. Other multi-step rules (event
//! creation reading the venue first) are not serialized.

pub mod images;
pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Event, EventId, Review, Ticket, TicketId, User, UserId, Venue, VenueId};
use crate::error::MarketError;

pub use images::{DiskImageStore, ImageStore, ImageUpload};
pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Identity store.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug {
    /// Inserts a new user.
    ///
    /// # Errors
    ///
    /// [`MarketError::Unprocessable`] if the email is already registered.
    async fn insert_user(&self, user: User) -> Result<User, MarketError>;

    /// Loads a user by id.
    ///
    /// # Errors
    ///
    /// [`MarketError::Persistence`] on backend failure.
    async fn find_user(&self, id: UserId) -> Result<Option<User>, MarketError>;

    /// Loads a user by (normalized) email.
    ///
    /// # Errors
    ///
    /// [`MarketError::Persistence`] on backend failure.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, MarketError>;
}

/// Venue store.
#[async_trait]
pub trait VenueStore: Send + Sync + std::fmt::Debug {
    /// Inserts a new venue.
    ///
    /// # Errors
    ///
    /// [`MarketError::Persistence`] on backend failure.
    async fn insert_venue(&self, venue: Venue) -> Result<Venue, MarketError>;

    /// Loads a venue by id.
    ///
    /// # Errors
    ///
    /// [`MarketError::Persistence`] on backend failure.
    async fn find_venue(&self, id: VenueId) -> Result<Option<Venue>, MarketError>;

    /// Lists venues in creation order, optionally only those of `owner`.
    ///
    /// # Errors
    ///
    /// [`MarketError::Persistence`] on backend failure.
    async fn list_venues(&self, owner: Option<UserId>) -> Result<Vec<Venue>, MarketError>;

    /// Replaces a stored venue.
    ///
    /// # Errors
    ///
    /// [`MarketError::NotFound`] if the venue no longer exists.
    async fn update_venue(&self, venue: Venue) -> Result<Venue, MarketError>;

    /// Appends a review and recomputes the rating under a per-venue lock.
    /// Returns `None` if the venue does not exist.
    ///
    /// # Errors
    ///
    /// [`MarketError::Persistence`] on backend failure.
    async fn append_venue_review(
        &self,
        id: VenueId,
        review: Review,
    ) -> Result<Option<Venue>, MarketError>;

    /// Deletes a venue. Returns `true` if it existed.
    ///
    /// # Errors
    ///
    /// [`MarketError::Persistence`] on backend failure.
    async fn delete_venue(&self, id: VenueId) -> Result<bool, MarketError>;
}

/// Event store.
#[async_trait]
pub trait EventStore: Send + Sync + std::fmt::Debug {
    /// Inserts a new event.
    ///
    /// # Errors
    ///
    /// [`MarketError::Persistence`] on backend failure.
    async fn insert_event(&self, event: Event) -> Result<Event, MarketError>;

    /// Loads an event by id.
    ///
    /// # Errors
    ///
    /// [`MarketError::Persistence`] on backend failure.
    async fn find_event(&self, id: EventId) -> Result<Option<Event>, MarketError>;

    /// Lists events in creation order, optionally only those of `organizer`.
    ///
    /// # Errors
    ///
    /// [`MarketError::Persistence`] on backend failure.
    async fn list_events(&self, organizer: Option<UserId>) -> Result<Vec<Event>, MarketError>;

    /// Replaces a stored event.
    ///
    /// # Errors
    ///
    /// [`MarketError::NotFound`] if the event no longer exists.
    async fn update_event(&self, event: Event) -> Result<Event, MarketError>;

    /// Appends a review under a per-event lock. Returns `None` if the event
    /// does not exist.
    ///
    /// # Errors
    ///
    /// [`MarketError::Persistence`] on backend failure.
    async fn append_event_review(
        &self,
        id: EventId,
        review: Review,
    ) -> Result<Option<Event>, MarketError>;

    /// Deletes an event. Returns `true` if it existed.
    ///
    /// # Errors
    ///
    /// [`MarketError::Persistence`] on backend failure.
    async fn delete_event(&self, id: EventId) -> Result<bool, MarketError>;
}

/// Ticket store.
#[async_trait]
pub trait TicketStore: Send + Sync + std::fmt::Debug {
    /// Inserts a new ticket.
    ///
    /// # Errors
    ///
    /// [`MarketError::Persistence`] on backend failure.
    async fn insert_ticket(&self, ticket: Ticket) -> Result<Ticket, MarketError>;

    /// Lists every ticket in creation order.
    ///
    /// # Errors
    ///
    /// [`MarketError::Persistence`] on backend failure.
    async fn list_tickets(&self) -> Result<Vec<Ticket>, MarketError>;

    /// Lists the tickets bought by `user` in creation order.
    ///
    /// # Errors
    ///
    /// [`MarketError::Persistence`] on backend failure.
    async fn list_tickets_for_user(&self, user: UserId) -> Result<Vec<Ticket>, MarketError>;

    /// Deletes a ticket. Returns `true` if it existed.
    ///
    /// # Errors
    ///
    /// [`MarketError::Persistence`] on backend failure.
    async fn delete_ticket(&self, id: TicketId) -> Result<bool, MarketError>;
}

/// Handles to every collection, cloned into the services that need them.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Identity store.
    pub users: Arc<dyn UserStore>,
    /// Venue store.
    pub venues: Arc<dyn VenueStore>,
    /// Event store.
    pub events: Arc<dyn EventStore>,
    /// Ticket store.
    pub tickets: Arc<dyn TicketStore>,
}

impl Stores {
    /// Uses one backend for all four collections.
    #[must_use]
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: UserStore + VenueStore + EventStore + TicketStore + 'static,
    {
        Self {
            users: Arc::clone(&backend) as Arc<dyn UserStore>,
            venues: Arc::clone(&backend) as Arc<dyn VenueStore>,
            events: Arc::clone(&backend) as Arc<dyn EventStore>,
            tickets: backend as Arc<dyn TicketStore>,
        }
    }

    /// In-memory stores.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_backend(Arc::new(MemoryStore::new()))
    }
}
