//! Ticket DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::common_dto::Populated;
use super::event_dto::EventDto;
use crate::domain::{Event, EventId, EventSnapshot, Ticket, TicketId, TicketSnapshot, UserId};

/// A ticket as rendered in responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketDto {
    /// Ticket id.
    #[serde(rename = "_id")]
    pub id: TicketId,
    /// Purchaser id.
    pub user_id: UserId,
    /// Event id, or the full event on `GET /tickets/user/:userId`
    /// (`null` once the event is gone).
    #[schema(value_type = Object)]
    pub event_id: Populated<EventId, EventDto>,
    /// Number of admissions.
    pub quantity: u32,
    /// Total amount paid.
    pub total_amount: f64,
    /// Event fields at purchase time.
    pub event_details: EventSnapshot,
    /// Ticket purchase fields.
    pub ticket_details: TicketSnapshot,
    /// Scannable payload.
    pub qr_code: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Ticket> for TicketDto {
    fn from(ticket: Ticket) -> Self {
        Self {
            id: ticket.id,
            user_id: ticket.user_id,
            event_id: Populated::Id(ticket.event_id),
            quantity: ticket.quantity,
            total_amount: ticket.total_amount,
            event_details: ticket.event_details,
            ticket_details: ticket.ticket_details,
            qr_code: ticket.qr_code,
            created_at: ticket.created_at,
        }
    }
}

impl TicketDto {
    /// Renders a ticket with its event expanded in place of the id.
    #[must_use]
    pub fn with_event(ticket: Ticket, event: Option<Event>) -> Self {
        Self {
            event_id: Populated::from_lookup(event.map(EventDto::from)),
            ..Self::from(ticket)
        }
    }
}

/// Response body for `POST /tickets` (201 Created).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateTicketResponse {
    /// Always `true`.
    pub success: bool,
    /// The stored ticket.
    pub ticket: TicketDto,
}
