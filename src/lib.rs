//! # venue-market
//!
//! REST API for an event and venue booking marketplace.
//!
//! Venue owners list venues, organizers book them for events, and attendees
//! buy tickets. Sessions are carried by a signed credential in the `token`
//! cookie; listings accept multipart uploads with images.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, cookie session)
//!     │
//!     ├── REST Handlers + extractors (api/, auth/)
//!     │
//!     ├── Identity / Venue / Event / Ticket services (service/)
//!     │
//!     ├── Store traits (store/)
//!     │     ├── MemoryStore
//!     │     └── PostgresStore (JSONB documents)
//!     │
//!     └── DiskImageStore (uploaded images)
//! ```

pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod store;
