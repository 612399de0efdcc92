//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use super::dto::{
    AvailabilityRequest, CreateTicketResponse, EventDto, EventForm, ProfileDto, ReviewDto,
    ReviewRequest, StatusRequest, TicketDto, UserContact, UserDto, UserName, VenueDto, VenueForm,
    VenueSummary,
};
use super::handlers::{event, identity, system, ticket, venue};
use crate::domain::{EventSnapshot, OrganizationDetails, Role, TicketSnapshot, VenueDetails};
use crate::error::ErrorResponse;
use crate::service::{
    EventDetailsInput, LoginRequest, Registration, TicketDetailsInput, TicketOrder,
};

/// Generated OpenAPI document, served by Swagger UI when the `swagger-ui`
/// feature is enabled.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "venue-market",
        description = "Marketplace where venue owners list venues, organizers book them for events, and attendees buy tickets."
    ),
    paths(
        identity::register,
        identity::login,
        identity::profile,
        identity::logout,
        venue::create_venue,
        venue::list_venues,
        venue::get_venue,
        venue::set_availability,
        venue::add_review,
        venue::delete_venue,
        event::create_event,
        event::list_events,
        event::get_event,
        event::set_status,
        event::add_review,
        event::delete_event,
        ticket::create_ticket,
        ticket::list_tickets,
        ticket::list_user_tickets,
        ticket::delete_ticket,
        system::health_handler,
        system::test_handler,
    ),
    components(schemas(
        Registration,
        LoginRequest,
        Role,
        VenueDetails,
        OrganizationDetails,
        UserDto,
        ProfileDto,
        UserContact,
        UserName,
        ReviewDto,
        ReviewRequest,
        VenueForm,
        VenueDto,
        AvailabilityRequest,
        EventForm,
        EventDto,
        VenueSummary,
        StatusRequest,
        TicketOrder,
        EventDetailsInput,
        TicketDetailsInput,
        EventSnapshot,
        TicketSnapshot,
        TicketDto,
        CreateTicketResponse,
        system::HealthResponse,
        ErrorResponse,
    )),
    tags(
        (name = "Identity", description = "Registration and cookie sessions"),
        (name = "Venues", description = "Venue listings and reviews"),
        (name = "Events", description = "Event bookings, status, and reviews"),
        (name = "Tickets", description = "Ticket purchases"),
        (name = "System", description = "Health and liveness"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/register",
            "/login",
            "/profile",
            "/logout",
            "/venues",
            "/venues/{id}",
            "/venues/{id}/availability",
            "/venues/{id}/reviews",
            "/events",
            "/events/{id}",
            "/events/{id}/status",
            "/events/{id}/reviews",
            "/tickets",
            "/tickets/{id}",
            "/tickets/user/{userId}",
            "/health",
            "/test",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
