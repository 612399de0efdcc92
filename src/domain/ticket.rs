//! Purchased tickets with a snapshot of the event at purchase time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{EventId, TicketId, UserId};

/// Event display fields copied into the ticket when it is bought.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventSnapshot {
    /// Event title.
    pub title: String,
    /// Event date as displayed to the buyer.
    pub date: String,
    /// Event time as displayed to the buyer.
    pub time: String,
    /// Venue name.
    pub venue: String,
    /// Ticket price advertised by the event.
    pub price: f64,
}

/// Purchase details of the ticket itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketSnapshot {
    /// Unit price paid.
    pub price: f64,
    /// Purchase date as recorded by the client.
    pub purchase_date: String,
}

/// A ticket as persisted in the ticket store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Unique identifier.
    #[serde(rename = "_id")]
    pub id: TicketId,
    /// Purchaser.
    pub user_id: UserId,
    /// Event the ticket admits to.
    pub event_id: EventId,
    /// Number of admissions.
    pub quantity: u32,
    /// Total amount paid.
    pub total_amount: f64,
    /// Event fields at purchase time.
    pub event_details: EventSnapshot,
    /// Ticket purchase fields.
    pub ticket_details: TicketSnapshot,
    /// Scannable payload generated by the client.
    pub qr_code: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Validated input for a new ticket.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTicket {
    /// Purchaser.
    pub user_id: UserId,
    /// Event the ticket admits to.
    pub event_id: EventId,
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
}

impl Ticket {
    /// Creates a ticket from validated input.
    #[must_use]
    pub fn new(input: NewTicket) -> Self {
        Self {
            id: TicketId::new(),
            user_id: input.user_id,
            event_id: input.event_id,
            quantity: input.quantity,
            total_amount: input.total_amount,
            event_details: input.event_details,
            ticket_details: input.ticket_details,
            qr_code: input.qr_code,
            created_at: Utc::now(),
        }
    }
}
