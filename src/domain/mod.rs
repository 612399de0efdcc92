//! Domain layer: identifiers, users, venues, events, tickets, reviews.
//!
//! These are the documents the stores persist. Cross-entity rules that only
//! need the documents themselves (rating averages, booking constraints) live
//! here; rules that need store access live in [`crate::service`].

pub mod event;
pub mod ids;
pub mod review;
pub mod ticket;
pub mod user;
pub mod venue;

pub use event::{BookingViolation, Event, NewEvent};
pub use ids::{EventId, TicketId, UserId, VenueId};
pub use review::Review;
pub use ticket::{EventSnapshot, NewTicket, Ticket, TicketSnapshot};
pub use user::{OrganizationDetails, Profile, Role, User, VenueDetails};
pub use venue::{NewVenue, Venue};
