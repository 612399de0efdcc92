//! Event handlers: create, list, get, status, reviews, delete.

use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};

use super::{UPLOAD_BODY_LIMIT, parse_id};
use crate::api::dto::{EventDto, EventForm, EventListQuery, ReviewRequest, StatusRequest};
use crate::api::expand::{Expander, event_list};
use crate::api::multipart::read_listing_form;
use crate::api::extract::ApiJson;
use crate::app_state::AppState;
use crate::auth::{CurrentUser, MaybeUser, authorize};
use crate::domain::{EventId, Role};
use crate::error::{ErrorResponse, MarketError};

/// `POST /events`: Create an event at a listed venue.
///
/// # Errors
///
/// Returns [`MarketError`] on missing fields, an unknown venue, or a venue
/// that is unavailable, too small, or too expensive for the budget.
#[utoipa::path(
    post,
    path = "/events",
    tag = "Events",
    summary = "Create an event",
    description = "Organizers only. Multipart form: text fields plus up to the configured number of `images` files. The venue must be available, hold the expected attendees, and cost no more than the budget for one day.",
    request_body(content = EventForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Event created", body = EventDto),
        (status = 400, description = "Missing fields, venue not available, capacity exceeded, or insufficient budget", body = ErrorResponse),
        (status = 403, description = "Not an organizer", body = ErrorResponse),
        (status = 404, description = "Venue not found", body = ErrorResponse),
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, MarketError> {
    authorize(&user, &[Role::Organizer])?;
    let (form, images) = read_listing_form(multipart, state.max_upload_images).await?;
    let event = state.events.create_event(&user, &form, images).await?;
    Ok((StatusCode::CREATED, Json(EventDto::from(event))))
}

/// `GET /events`: List events.
///
/// # Errors
///
/// Returns [`MarketError::Unauthenticated`] for `?organizer=true` without a
/// session.
#[utoipa::path(
    get,
    path = "/events",
    tag = "Events",
    summary = "List events",
    description = "All events, or only the caller's with `?organizer=true`. Organizers are expanded to `{_id, name, email}` and venues to `{_id, name, address}`.",
    params(EventListQuery),
    responses(
        (status = 200, description = "Event list", body = Vec<EventDto>),
        (status = 401, description = "`organizer=true` without a session", body = ErrorResponse),
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Query(query): Query<EventListQuery>,
) -> Result<impl IntoResponse, MarketError> {
    let events = state.events.list_events(user.as_ref(), query.mine()).await?;
    Ok(Json(event_list(&state.stores, events).await?))
}

/// `GET /events/:id`: Event detail.
///
/// # Errors
///
/// Returns [`MarketError::Validation`] on a malformed id.
#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "Events",
    summary = "Get an event",
    description = "Organizer and attendees expanded to `{_id, name, email}`, venue to `{_id, name, address, capacity, amenities}`. Returns `null` for an unknown id.",
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event or null", body = Option<EventDto>),
        (status = 400, description = "Malformed id", body = ErrorResponse),
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, MarketError> {
    let id: EventId = parse_id(&id, "event")?;
    let dto = match state.events.get_event(id).await? {
        Some(event) => Some(Expander::new(&state.stores).event_detail(event).await?),
        None => None,
    };
    Ok(Json(dto))
}

/// `PUT /events/:id/status`: Set the workflow status.
///
/// # Errors
///
/// Returns [`MarketError`] if the event is missing or the caller does not
/// own its venue.
#[utoipa::path(
    put,
    path = "/events/{id}/status",
    tag = "Events",
    summary = "Set event status",
    description = "Only the owner of the event's venue may change the status. Any string is accepted.",
    params(("id" = String, Path, description = "Event id")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Updated event", body = EventDto),
        (status = 403, description = "Not the venue owner", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn set_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<StatusRequest>,
) -> Result<impl IntoResponse, MarketError> {
    let id: EventId = parse_id(&id, "event")?;
    let event = state.events.set_status(&user, id, req.status).await?;
    Ok(Json(EventDto::from(event)))
}

/// `POST /events/:id/reviews`: Review an event.
///
/// # Errors
///
/// Returns [`MarketError`] on an invalid rating or unknown event.
#[utoipa::path(
    post,
    path = "/events/{id}/reviews",
    tag = "Events",
    summary = "Review an event",
    description = "Any logged-in user. Appends the review; events keep no aggregate rating.",
    params(("id" = String, Path, description = "Event id")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Updated event", body = EventDto),
        (status = 400, description = "Rating missing or outside 1..5", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn add_review(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<ReviewRequest>,
) -> Result<impl IntoResponse, MarketError> {
    let id: EventId = parse_id(&id, "event")?;
    let event = state
        .events
        .add_review(&user, id, req.rating, req.comment)
        .await?;
    Ok(Json(EventDto::from(event)))
}

/// `DELETE /events/:id`: Remove an event.
///
/// # Errors
///
/// Returns [`MarketError`] if the event is missing or the caller did not
/// organize it.
#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = "Events",
    summary = "Delete an event",
    description = "Only the event's organizer may delete it.",
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 403, description = "Not the organizer", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn delete_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, MarketError> {
    let id: EventId = parse_id(&id, "event")?;
    state.events.delete_event(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Event routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/events",
            post(create_event)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
                .get(list_events),
        )
        .route("/events/{id}", get(get_event).delete(delete_event))
        .route("/events/{id}/status", put(set_status))
        .route("/events/{id}/reviews", post(add_review))
}
