//! Identity handlers: register, login, profile, logout.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::api::dto::{ProfileDto, UserDto};
use crate::api::extract::ApiJson;
use crate::app_state::AppState;
use crate::auth::TOKEN_COOKIE;
use crate::error::{ErrorResponse, MarketError};
use crate::service::{LoginRequest, Registration};

fn token_cookie(value: String) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// `POST /register`: Register a new user.
///
/// # Errors
///
/// Returns [`MarketError::Unprocessable`] on invalid input or a duplicate
/// email.
#[utoipa::path(
    post,
    path = "/register",
    tag = "Identity",
    summary = "Register a user",
    description = "Creates an attendee, venue owner, or organizer. `venueDetails` is kept only for venue owners and `organizationDetails` only for organizers.",
    request_body = Registration,
    responses(
        (status = 200, description = "User registered", body = UserDto),
        (status = 400, description = "Malformed JSON body", body = ErrorResponse),
        (status = 422, description = "Invalid input or email already registered", body = ErrorResponse),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<Registration>,
) -> Result<impl IntoResponse, MarketError> {
    let user = state.identity.register(req).await?;
    Ok(Json(UserDto::from(user)))
}

/// `POST /login`: Log in and receive the session cookie.
///
/// # Errors
///
/// - [`MarketError::NotFound`] if no user has this email.
/// - [`MarketError::Unauthenticated`] on a wrong password.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Identity",
    summary = "Log in",
    description = "Checks the password and sets the `token` cookie carrying the session credential.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; `token` cookie set", body = UserDto),
        (status = 400, description = "Malformed JSON body", body = ErrorResponse),
        (status = 401, description = "Wrong password", body = ErrorResponse),
        (status = 404, description = "No user with this email", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, MarketError> {
    let (user, token) = state.identity.login(&req.email, &req.password).await?;
    Ok((jar.add(token_cookie(token)), Json(UserDto::from(user))))
}

/// `GET /profile`: Resolve the session cookie to the current user.
///
/// # Errors
///
/// Returns [`MarketError::Unauthenticated`] if a cookie is present but
/// invalid.
#[utoipa::path(
    get,
    path = "/profile",
    tag = "Identity",
    summary = "Current user",
    description = "Returns `{name, email, _id, role}` for the session cookie, or `null` when no cookie is sent.",
    responses(
        (status = 200, description = "Current user or null", body = Option<ProfileDto>),
        (status = 401, description = "Invalid credential", body = ErrorResponse),
    )
)]
pub async fn profile(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, MarketError> {
    let credential = jar.get(TOKEN_COOKIE).map(Cookie::value);
    let user = state.identity.profile(credential).await?;
    Ok(Json(user.map(ProfileDto::from)))
}

/// `POST /logout`: Clear the session cookie.
///
/// The credential itself stays valid; only the cookie is emptied.
#[utoipa::path(
    post,
    path = "/logout",
    tag = "Identity",
    summary = "Log out",
    description = "Overwrites the `token` cookie with an empty value and returns `true`.",
    responses(
        (status = 200, description = "Cookie cleared", body = bool),
    )
)]
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (jar.add(token_cookie(String::new())), Json(true))
}

/// Identity routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/profile", get(profile))
        .route("/logout", post(logout))
}
