//! Ticket handlers: purchase, list, delete.
//!
//! Listing and deletion are open to anonymous callers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use super::parse_id;
use crate::api::dto::{CreateTicketResponse, TicketDto};
use crate::api::extract::ApiJson;
use crate::app_state::AppState;
use crate::auth::CurrentUser;
use crate::domain::{TicketId, UserId};
use crate::error::{ErrorResponse, MarketError};
use crate::service::TicketOrder;

/// `POST /tickets`: Record a ticket purchase.
///
/// # Errors
///
/// Returns [`MarketError::Validation`] naming the first group of missing
/// fields.
#[utoipa::path(
    post,
    path = "/tickets",
    tag = "Tickets",
    summary = "Buy a ticket",
    description = "Any logged-in user. The event snapshot is stored as sent and is not checked against the live event.",
    request_body = TicketOrder,
    responses(
        (status = 201, description = "Ticket created", body = CreateTicketResponse),
        (status = 400, description = "Missing required fields, event details, or ticket details", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
    )
)]
pub async fn create_ticket(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    ApiJson(order): ApiJson<TicketOrder>,
) -> Result<impl IntoResponse, MarketError> {
    let ticket = state.tickets.create_ticket(order).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateTicketResponse {
            success: true,
            ticket: TicketDto::from(ticket),
        }),
    ))
}

/// `GET /tickets/:id`: List every ticket. The id is ignored.
///
/// # Errors
///
/// Returns [`MarketError::Persistence`] on store failure.
#[utoipa::path(
    get,
    path = "/tickets/{id}",
    tag = "Tickets",
    summary = "List all tickets",
    description = "Returns every stored ticket regardless of the path id.",
    params(("id" = String, Path, description = "Ignored")),
    responses(
        (status = 200, description = "All tickets", body = Vec<TicketDto>),
    )
)]
pub async fn list_tickets(
    State(state): State<AppState>,
    Path(_id): Path<String>,
) -> Result<impl IntoResponse, MarketError> {
    let tickets = state.tickets.list_all().await?;
    Ok(Json(
        tickets.into_iter().map(TicketDto::from).collect::<Vec<_>>(),
    ))
}

/// `GET /tickets/user/:userId`: Tickets bought by a user, each with its
/// event expanded.
///
/// # Errors
///
/// Returns [`MarketError::Validation`] on a malformed user id.
#[utoipa::path(
    get,
    path = "/tickets/user/{userId}",
    tag = "Tickets",
    summary = "List a user's tickets",
    description = "`eventId` is replaced by the full event, or `null` if the event no longer exists.",
    params(("userId" = String, Path, description = "Purchaser id")),
    responses(
        (status = 200, description = "The user's tickets", body = Vec<TicketDto>),
        (status = 400, description = "Malformed id", body = ErrorResponse),
    )
)]
pub async fn list_user_tickets(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, MarketError> {
    let user_id: UserId = parse_id(&user_id, "user")?;
    let tickets = state.tickets.list_for_user(user_id).await?;
    Ok(Json(
        tickets
            .into_iter()
            .map(|(ticket, event)| TicketDto::with_event(ticket, event))
            .collect::<Vec<_>>(),
    ))
}

/// `DELETE /tickets/:id`: Delete a ticket.
///
/// # Errors
///
/// Returns [`MarketError::Validation`] on a malformed id.
#[utoipa::path(
    delete,
    path = "/tickets/{id}",
    tag = "Tickets",
    summary = "Delete a ticket",
    description = "Deletes by id without an ownership check. Unknown ids also return 204.",
    params(("id" = String, Path, description = "Ticket id")),
    responses(
        (status = 204, description = "Ticket deleted"),
        (status = 400, description = "Malformed id", body = ErrorResponse),
    )
)]
pub async fn delete_ticket(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, MarketError> {
    let id: TicketId = parse_id(&id, "ticket")?;
    state.tickets.delete_ticket(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Ticket routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tickets", post(create_ticket))
        .route("/tickets/{id}", get(list_tickets).delete(delete_ticket))
        .route("/tickets/user/{user_id}", get(list_user_tickets))
}
