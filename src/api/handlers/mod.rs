//! REST endpoint handlers organized by resource.

pub mod event;
pub mod identity;
pub mod system;
pub mod ticket;
pub mod venue;

use std::str::FromStr;

use axum::Router;

use crate::app_state::AppState;
use crate::error::MarketError;

/// Request body limit for the multipart listing endpoints.
pub const UPLOAD_BODY_LIMIT: usize = 25 * 1024 * 1024;

/// Parses a path segment into a typed id.
///
/// # Errors
///
/// Returns [`MarketError::Validation`] with `Invalid {entity} id` when the
/// segment is not a valid id.
pub(crate) fn parse_id<T: FromStr>(raw: &str, entity: &str) -> Result<T, MarketError> {
    raw.parse()
        .map_err(|_| MarketError::validation_with(format!("Invalid {entity} id"), raw))
}

/// Composes all resource routes at the root level.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(identity::routes())
        .merge(venue::routes())
        .merge(event::routes())
        .merge(ticket::routes())
        .merge(system::routes())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::VenueId;

    #[test]
    fn parse_id_names_the_entity() {
        let id = VenueId::new();
        let Ok(parsed) = parse_id::<VenueId>(&id.to_string(), "venue") else {
            panic!("valid id rejected");
        };
        assert_eq!(parsed, id);

        let Err(MarketError::Validation { message, .. }) = parse_id::<VenueId>("nope", "venue")
        else {
            panic!("malformed id accepted");
        };
        assert_eq!(message, "Invalid venue id");
    }
}
