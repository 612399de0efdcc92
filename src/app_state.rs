//! Shared application state injected into all Axum handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{CredentialService, PasswordHasher};
use crate::config::MarketConfig;
use crate::service::{EventService, IdentityService, TicketService, VenueService};
use crate::store::{DiskImageStore, ImageStore, Stores};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Registration, login, and credential resolution.
    pub identity: Arc<IdentityService>,
    /// Venue rules.
    pub venues: Arc<VenueService>,
    /// Event rules.
    pub events: Arc<EventService>,
    /// Ticket purchases.
    pub tickets: Arc<TicketService>,
    /// Raw store handles, used to expand references in responses.
    pub stores: Stores,
    /// Maximum number of images accepted per listing upload.
    pub max_upload_images: usize,
}

impl AppState {
    /// Wires the services over `stores` and `images`.
    #[must_use]
    pub fn new(
        stores: Stores,
        images: Arc<dyn ImageStore>,
        credentials: CredentialService,
        hasher: PasswordHasher,
        max_upload_images: usize,
    ) -> Self {
        let identity = Arc::new(IdentityService::new(
            Arc::clone(&stores.users),
            credentials,
            hasher,
        ));
        let venues = Arc::new(VenueService::new(
            Arc::clone(&stores.venues),
            Arc::clone(&images),
        ));
        let events = Arc::new(EventService::new(
            Arc::clone(&stores.events),
            Arc::clone(&stores.venues),
            images,
        ));
        let tickets = Arc::new(TicketService::new(
            Arc::clone(&stores.tickets),
            Arc::clone(&stores.events),
        ));
        Self {
            identity,
            venues,
            events,
            tickets,
            stores,
            max_upload_images,
        }
    }

    /// Wires the services from loaded configuration: credentials signed with
    /// `JWT_SECRET`, images written under `UPLOAD_DIR`, passwords hashed with
    /// the default Argon2id cost.
    #[must_use]
    pub fn from_config(config: &MarketConfig, stores: Stores) -> Self {
        let ttl = (config.token_ttl_secs > 0).then(|| Duration::from_secs(config.token_ttl_secs));
        Self::new(
            stores,
            Arc::new(DiskImageStore::new(config.upload_dir.clone())),
            CredentialService::new(config.jwt_secret.as_bytes(), ttl),
            PasswordHasher::default(),
            config.max_upload_images,
        )
    }
}
