//! Axum extractors resolving the `token` cookie to a user.
//!
//! - [`CurrentUser`] requires a valid credential (401 otherwise).
//! - [`MaybeUser`] yields `None` when no credential is sent or the one sent
//!   no longer verifies (expired, re-keyed, or bound to a deleted user).
//!
//! The credential is verified once per request and never cached.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::app_state::AppState;
use crate::domain::User;
use crate::error::MarketError;

/// Name of the cookie carrying the credential.
pub const TOKEN_COOKIE: &str = "token";

/// Reads the credential from the request cookies. An empty value (left by
/// logout) counts as absent.
#[must_use]
pub fn credential_from_parts(parts: &Parts) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

/// Authenticated caller.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = MarketError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = credential_from_parts(parts)
            .ok_or_else(|| MarketError::Unauthenticated("Authentication required".to_string()))?;
        let user = state.identity.authenticate(&token).await?;
        Ok(Self(user))
    }
}

/// Caller that may or may not be authenticated. A stale credential is
/// treated as absent; store failures are still errors.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = MarketError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = credential_from_parts(parts) else {
            return Ok(Self(None));
        };
        match state.identity.authenticate(&token).await {
            Ok(user) => Ok(Self(Some(user))),
            Err(MarketError::Unauthenticated(reason)) => {
                debug!(%reason, "ignoring stale credential on optional-auth route");
                Ok(Self(None))
            }
            Err(e) => Err(e),
        }
    }
}
