//! Request body extractors.

use axum::extract::FromRequest;

use crate::error::MarketError;

/// JSON request body. Rejections (wrong content type, malformed JSON, wrong
/// field types) surface as [`MarketError::Validation`] so every 4xx shares
/// the JSON error shape.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(MarketError))]
pub struct ApiJson<T>(pub T);
