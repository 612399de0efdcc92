//! Service layer: business rules on top of the stores.
//!
//! Each service owns the store handles it needs and enforces role and
//! ownership checks itself, so handlers only translate HTTP to calls.

pub mod event_service;
pub mod form;
pub mod identity_service;
pub mod lenient;
pub mod ticket_service;
pub mod venue_service;

pub use event_service::EventService;
pub use form::FormFields;
pub use identity_service::{IdentityService, LoginRequest, Registration};
pub use ticket_service::{EventDetailsInput, TicketDetailsInput, TicketOrder, TicketService};
pub use venue_service::VenueService;

use crate::domain::review::{MAX_RATING, MIN_RATING};
use crate::error::MarketError;

/// Checks that a review rating is present and a whole number within range.
///
/// # Errors
///
/// Returns [`MarketError::Validation`] otherwise.
pub fn validate_rating(rating: Option<f64>) -> Result<u8, MarketError> {
    let Some(r) = rating else {
        return Err(MarketError::validation("Missing rating"));
    };
    form::whole_count(r)
        .and_then(|n| u8::try_from(n).ok())
        .filter(|n| (MIN_RATING..=MAX_RATING).contains(n))
        .ok_or_else(|| {
            MarketError::validation_with(
                "Invalid rating",
                format!("Rating must be a whole number from {MIN_RATING} to {MAX_RATING}, got {r}"),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratings_must_be_whole_and_in_range() {
        assert!(matches!(validate_rating(Some(5.0)), Ok(5)));
        assert!(matches!(validate_rating(Some(1.0)), Ok(1)));
        for bad in [0.0, 6.0, 4.5, -3.0, f64::NAN] {
            assert!(matches!(
                validate_rating(Some(bad)),
                Err(MarketError::Validation { ref message, .. }) if message == "Invalid rating"
            ));
        }
        assert!(matches!(
            validate_rating(None),
            Err(MarketError::Validation { ref message, .. }) if message == "Missing rating"
        ));
    }
}
