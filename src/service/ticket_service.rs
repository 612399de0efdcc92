//! Ticket service: purchase records with event snapshots.
//!
//! Tickets are not cross-checked against the live event: quantity is never
//! compared with remaining capacity and the snapshot is taken as sent.

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

use super::form::whole_count;
use super::lenient;
use crate::domain::{
    Event, EventId, EventSnapshot, NewTicket, Ticket, TicketId, TicketSnapshot, UserId,
};
use crate::error::MarketError;
use crate::store::{EventStore, TicketStore};

/// Event fields as sent by the client at purchase time.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventDetailsInput {
    /// Event title.
    #[serde(default)]
    pub title: Option<String>,
    /// Event date.
    #[serde(default)]
    pub date: Option<String>,
    /// Event time.
    #[serde(default)]
    pub time: Option<String>,
    /// Venue name.
    #[serde(default)]
    pub venue: Option<String>,
    /// Advertised ticket price.
    #[serde(default, deserialize_with = "lenient::number")]
    pub price: Option<f64>,
}

/// Ticket purchase fields as sent by the client.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketDetailsInput {
    /// Unit price paid.
    #[serde(default, deserialize_with = "lenient::number")]
    pub price: Option<f64>,
    /// Purchase date.
    #[serde(default)]
    pub purchase_date: Option<String>,
}

/// Request body for `POST /tickets`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketOrder {
    /// Purchaser id.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Event id.
    #[serde(default)]
    pub event_id: Option<String>,
    /// Number of admissions, a whole number.
    #[serde(default, deserialize_with = "lenient::number")]
    #[schema(value_type = Option<u32>)]
    pub quantity: Option<f64>,
    /// Total amount paid.
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_amount: Option<f64>,
    /// Event snapshot.
    #[serde(default)]
    pub event_details: Option<EventDetailsInput>,
    /// Ticket snapshot.
    #[serde(default)]
    pub ticket_details: Option<TicketDetailsInput>,
    /// Scannable payload.
    #[serde(default)]
    pub qr_code: Option<String>,
}

/// Records and lists ticket purchases.
#[derive(Debug, Clone)]
pub struct TicketService {
    tickets: Arc<dyn TicketStore>,
    events: Arc<dyn EventStore>,
}

impl TicketService {
    /// Creates a new `TicketService`.
    #[must_use]
    pub fn new(tickets: Arc<dyn TicketStore>, events: Arc<dyn EventStore>) -> Self {
        Self { tickets, events }
    }

    /// Records a ticket purchase.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Validation`] if a top-level field, an event
    /// snapshot field, or a ticket snapshot field is missing, or an id is
    /// malformed. Nothing is stored in that case.
    pub async fn create_ticket(&self, order: TicketOrder) -> Result<Ticket, MarketError> {
        let input = validate_order(order)?;
        let ticket = self.tickets.insert_ticket(Ticket::new(input)).await?;
        info!(
            ticket_id = %ticket.id,
            user_id = %ticket.user_id,
            event_id = %ticket.event_id,
            quantity = ticket.quantity,
            "ticket purchased"
        );
        Ok(ticket)
    }

    /// Every ticket in the store.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Persistence`] on store failure.
    pub async fn list_all(&self) -> Result<Vec<Ticket>, MarketError> {
        self.tickets.list_tickets().await
    }

    /// Tickets bought by `user`, each paired with its event if it still
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Persistence`] on store failure.
    pub async fn list_for_user(
        &self,
        user: UserId,
    ) -> Result<Vec<(Ticket, Option<Event>)>, MarketError> {
        let tickets = self.tickets.list_tickets_for_user(user).await?;
        let mut out = Vec::with_capacity(tickets.len());
        for ticket in tickets {
            let event = self.events.find_event(ticket.event_id).await?;
            out.push((ticket, event));
        }
        Ok(out)
    }

    /// Deletes a ticket. Deleting an unknown ticket is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Persistence`] on store failure.
    pub async fn delete_ticket(&self, id: TicketId) -> Result<(), MarketError> {
        if self.tickets.delete_ticket(id).await? {
            info!(ticket_id = %id, "ticket deleted");
        }
        Ok(())
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Checks an order in three passes (top-level fields, event snapshot,
/// ticket snapshot), each with its own message.
///
/// # Errors
///
/// Returns [`MarketError::Validation`] describing the first failing pass.
pub fn validate_order(order: TicketOrder) -> Result<NewTicket, MarketError> {
    let (
        Some(user_id),
        Some(event_id),
        Some(quantity),
        Some(total_amount),
        Some(event_details),
        Some(ticket_details),
        Some(qr_code),
    ) = (
        present(order.user_id),
        present(order.event_id),
        positive(order.quantity),
        positive(order.total_amount),
        order.event_details,
        order.ticket_details,
        present(order.qr_code),
    )
    else {
        return Err(MarketError::validation("Missing required fields"));
    };

    let (Some(title), Some(date), Some(time), Some(venue), Some(price)) = (
        present(event_details.title),
        present(event_details.date),
        present(event_details.time),
        present(event_details.venue),
        positive(event_details.price),
    ) else {
        return Err(MarketError::validation("Missing required event details"));
    };

    let (Some(unit_price), Some(purchase_date)) = (
        positive(ticket_details.price),
        present(ticket_details.purchase_date),
    ) else {
        return Err(MarketError::validation("Missing required ticket details"));
    };

    let quantity = whole_count(quantity).ok_or_else(|| {
        MarketError::validation_with("Invalid quantity", "Quantity must be a whole number")
    })?;
    let user_id = user_id
        .parse::<UserId>()
        .map_err(|_| MarketError::validation("Invalid user id"))?;
    let event_id = event_id
        .parse::<EventId>()
        .map_err(|_| MarketError::validation("Invalid event id"))?;

    Ok(NewTicket {
        user_id,
        event_id,
        quantity,
        total_amount,
        event_details: EventSnapshot {
            title,
            date,
            time,
            venue,
            price,
        },
        ticket_details: TicketSnapshot {
            price: unit_price,
            purchase_date,
        },
        qr_code,
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::store::Stores;

    fn order(user: UserId) -> TicketOrder {
        TicketOrder {
            user_id: Some(user.to_string()),
            event_id: Some(EventId::new().to_string()),
            quantity: Some(2.0),
            total_amount: Some(40.0),
            event_details: Some(EventDetailsInput {
                title: Some("Launch".to_string()),
                date: Some("2026-05-01".to_string()),
                time: Some("18:00".to_string()),
                venue: Some("Grand Hall".to_string()),
                price: Some(20.0),
            }),
            ticket_details: Some(TicketDetailsInput {
                price: Some(20.0),
                purchase_date: Some("2026-04-01".to_string()),
            }),
            qr_code: Some("QR-1".to_string()),
        }
    }

    fn service() -> TicketService {
        let stores = Stores::in_memory();
        TicketService::new(stores.tickets, stores.events)
    }

    fn message(result: Result<NewTicket, MarketError>) -> String {
        match result {
            Err(MarketError::Validation { message, .. }) => message,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn each_validation_pass_has_its_own_message() {
        let user = UserId::new();

        let mut top = order(user);
        top.qr_code = None;
        assert_eq!(message(validate_order(top)), "Missing required fields");

        let mut event = order(user);
        if let Some(details) = event.event_details.as_mut() {
            details.venue = None;
        }
        assert_eq!(message(validate_order(event)), "Missing required event details");

        let mut ticket = order(user);
        if let Some(details) = ticket.ticket_details.as_mut() {
            details.purchase_date = None;
        }
        assert_eq!(message(validate_order(ticket)), "Missing required ticket details");

        let mut zero = order(user);
        zero.quantity = Some(0.0);
        assert_eq!(message(validate_order(zero)), "Missing required fields");

        let mut half = order(user);
        half.quantity = Some(1.5);
        assert_eq!(message(validate_order(half)), "Invalid quantity");
    }

    #[tokio::test]
    async fn rejected_ticket_is_not_stored() {
        let svc = service();
        let user = UserId::new();
        let mut bad = order(user);
        if let Some(details) = bad.ticket_details.as_mut() {
            details.purchase_date = None;
        }
        assert!(svc.create_ticket(bad).await.is_err());
        assert_eq!(svc.list_all().await.map(|t| t.len()).ok(), Some(0));
    }

    #[tokio::test]
    async fn list_by_user_and_delete() {
        let svc = service();
        let (dave, erin) = (UserId::new(), UserId::new());
        let Ok(ticket) = svc.create_ticket(order(dave)).await else {
            panic!("create failed");
        };
        let _ = svc.create_ticket(order(erin)).await;

        let Ok(mine) = svc.list_for_user(dave).await else {
            panic!("list failed");
        };
        assert_eq!(mine.len(), 1);
        assert!(mine.first().is_some_and(|(t, event)| t.id == ticket.id && event.is_none()));
        assert_eq!(svc.list_all().await.map(|t| t.len()).ok(), Some(2));

        assert!(svc.delete_ticket(ticket.id).await.is_ok());
        assert!(svc.delete_ticket(ticket.id).await.is_ok());
        assert_eq!(svc.list_all().await.map(|t| t.len()).ok(), Some(1));
    }
}
