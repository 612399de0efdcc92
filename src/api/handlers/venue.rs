//! Venue handlers: create, list, get, availability, reviews, delete.

use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};

use super::{UPLOAD_BODY_LIMIT, parse_id};
use crate::api::dto::{AvailabilityRequest, ReviewRequest, VenueDto, VenueForm, VenueListQuery};
use crate::api::expand::{Expander, venue_list};
use crate::api::multipart::read_listing_form;
use crate::api::extract::ApiJson;
use crate::app_state::AppState;
use crate::auth::{CurrentUser, MaybeUser, authorize};
use crate::domain::{Role, VenueId};
use crate::error::{ErrorResponse, MarketError};

/// `POST /venues`: List a new venue.
///
/// # Errors
///
/// Returns [`MarketError`] on missing fields, malformed amenities, too many
/// images, or a caller who is not a venue owner.
#[utoipa::path(
    post,
    path = "/venues",
    tag = "Venues",
    summary = "Create a venue",
    description = "Venue owners only. Multipart form: text fields plus up to the configured number of `images` files. `amenities` is a JSON array of strings; `availability` is true only when it is `\"true\"`.",
    request_body(content = VenueForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Venue created", body = VenueDto),
        (status = 400, description = "Missing fields or invalid amenities", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 403, description = "Not a venue owner", body = ErrorResponse),
    )
)]
pub async fn create_venue(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, MarketError> {
    authorize(&user, &[Role::VenueOwner])?;
    let (form, images) = read_listing_form(multipart, state.max_upload_images).await?;
    let venue = state.venues.create_venue(&user, &form, images).await?;
    Ok((StatusCode::CREATED, Json(VenueDto::from(venue))))
}

/// `GET /venues`: List venues.
///
/// # Errors
///
/// Returns [`MarketError::Unauthenticated`] for `?owner=true` without a
/// session.
#[utoipa::path(
    get,
    path = "/venues",
    tag = "Venues",
    summary = "List venues",
    description = "All venues, or only the caller's with `?owner=true`. Owners are expanded to `{_id, name, email}`.",
    params(VenueListQuery),
    responses(
        (status = 200, description = "Venue list", body = Vec<VenueDto>),
        (status = 401, description = "`owner=true` without a session", body = ErrorResponse),
    )
)]
pub async fn list_venues(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Query(query): Query<VenueListQuery>,
) -> Result<impl IntoResponse, MarketError> {
    let venues = state.venues.list_venues(user.as_ref(), query.mine()).await?;
    Ok(Json(venue_list(&state.stores, venues).await?))
}

/// `GET /venues/:id`: Venue detail.
///
/// # Errors
///
/// Returns [`MarketError::Validation`] on a malformed id.
#[utoipa::path(
    get,
    path = "/venues/{id}",
    tag = "Venues",
    summary = "Get a venue",
    description = "Owner expanded to `{_id, name, email}`, review authors to `{_id, name}`. Returns `null` for an unknown id.",
    params(("id" = String, Path, description = "Venue id")),
    responses(
        (status = 200, description = "Venue or null", body = Option<VenueDto>),
        (status = 400, description = "Malformed id", body = ErrorResponse),
    )
)]
pub async fn get_venue(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, MarketError> {
    let id: VenueId = parse_id(&id, "venue")?;
    let dto = match state.venues.get_venue(id).await? {
        Some(venue) => Some(Expander::new(&state.stores).venue_detail(venue).await?),
        None => None,
    };
    Ok(Json(dto))
}

/// `PUT /venues/:id/availability`: Open or close a venue.
///
/// # Errors
///
/// Returns [`MarketError`] if the venue is missing or the caller does not
/// own it.
#[utoipa::path(
    put,
    path = "/venues/{id}/availability",
    tag = "Venues",
    summary = "Set venue availability",
    description = "Only the venue's owner may change availability.",
    params(("id" = String, Path, description = "Venue id")),
    request_body = AvailabilityRequest,
    responses(
        (status = 200, description = "Updated venue", body = VenueDto),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Venue not found", body = ErrorResponse),
    )
)]
pub async fn set_availability(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<AvailabilityRequest>,
) -> Result<impl IntoResponse, MarketError> {
    let id: VenueId = parse_id(&id, "venue")?;
    let availability = req
        .availability
        .ok_or_else(|| MarketError::validation("Missing availability"))?;
    let venue = state.venues.set_availability(&user, id, availability).await?;
    Ok(Json(VenueDto::from(venue)))
}

/// `POST /venues/:id/reviews`: Review a venue.
///
/// # Errors
///
/// Returns [`MarketError`] on an invalid rating or unknown venue.
#[utoipa::path(
    post,
    path = "/venues/{id}/reviews",
    tag = "Venues",
    summary = "Review a venue",
    description = "Any logged-in user. Appends the review and recomputes the venue rating as the mean of all ratings.",
    params(("id" = String, Path, description = "Venue id")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Updated venue", body = VenueDto),
        (status = 400, description = "Rating missing or outside 1..5", body = ErrorResponse),
        (status = 404, description = "Venue not found", body = ErrorResponse),
    )
)]
pub async fn add_review(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<ReviewRequest>,
) -> Result<impl IntoResponse, MarketError> {
    let id: VenueId = parse_id(&id, "venue")?;
    let venue = state
        .venues
        .add_review(&user, id, req.rating, req.comment)
        .await?;
    Ok(Json(VenueDto::from(venue)))
}

/// `DELETE /venues/:id`: Remove a venue.
///
/// # Errors
///
/// Returns [`MarketError`] if the venue is missing or the caller does not
/// own it.
#[utoipa::path(
    delete,
    path = "/venues/{id}",
    tag = "Venues",
    summary = "Delete a venue",
    description = "Only the venue's owner may delete it.",
    params(("id" = String, Path, description = "Venue id")),
    responses(
        (status = 204, description = "Venue deleted"),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Venue not found", body = ErrorResponse),
    )
)]
pub async fn delete_venue(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, MarketError> {
    let id: VenueId = parse_id(&id, "venue")?;
    state.venues.delete_venue(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Venue routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/venues",
            post(create_venue)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
                .get(list_venues),
        )
        .route("/venues/{id}", get(get_venue).delete(delete_venue))
        .route("/venues/{id}/availability", put(set_availability))
        .route("/venues/{id}/reviews", post(add_review))
}
