//! Reviews appended to venues and events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Lowest accepted rating.
pub const MIN_RATING: u8 = 1;
/// Highest accepted rating.
pub const MAX_RATING: u8 = 5;

/// A single review left by an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Author of the review.
    pub user: UserId,
    /// Star rating in `MIN_RATING..=MAX_RATING`.
    pub rating: u8,
    /// Free-form comment, possibly empty.
    #[serde(default)]
    pub comment: String,
    /// When the review was written.
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Creates a review stamped with the current time.
    #[must_use]
    pub fn new(user: UserId, rating: u8, comment: String) -> Self {
        Self {
            user,
            rating,
            comment,
            created_at: Utc::now(),
        }
    }
}

/// Arithmetic mean of all ratings, `0.0` when there are none.
#[must_use]
pub fn mean_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let total: u64 = reviews.iter().map(|r| u64::from(r.rating)).sum();
    #[allow(clippy::cast_precision_loss)]
    let mean = total as f64 / reviews.len() as f64;
    mean
}
