//! Shared DTO types used across multiple endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Review, User, UserId};
use crate::service::lenient;

/// A reference to another document, rendered either as its id or as a
/// projection of the referenced document. A reference whose target no
/// longer exists renders as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Populated<I, T> {
    /// Projection of the referenced document.
    Doc(T),
    /// Bare identifier.
    Id(I),
    /// Target no longer exists.
    Missing,
}

impl<I, T> Populated<I, T> {
    /// Projects `doc` when found, `Missing` otherwise.
    pub fn from_lookup(doc: Option<T>) -> Self {
        doc.map_or(Self::Missing, Self::Doc)
    }
}

/// User projection with contact fields.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct UserContact {
    /// User id.
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email.
    pub email: String,
}

impl From<&User> for UserContact {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// User projection with the name only.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct UserName {
    /// User id.
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Display name.
    pub name: String,
}

impl From<&User> for UserName {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
        }
    }
}

/// A review as rendered in responses.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDto {
    /// Author id, or `{_id, name}` on detail views.
    #[schema(value_type = Object)]
    pub user: Populated<UserId, UserName>,
    /// Star rating, 1 to 5.
    pub rating: u8,
    /// Comment, possibly empty.
    pub comment: String,
    /// When the review was written.
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewDto {
    fn from(review: Review) -> Self {
        Self {
            user: Populated::Id(review.user),
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
        }
    }
}

/// Request body for `POST /venues/:id/reviews` and `POST /events/:id/reviews`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ReviewRequest {
    /// Star rating, a whole number from 1 to 5. Numeric strings are accepted.
    #[serde(default, deserialize_with = "lenient::number")]
    #[schema(value_type = Option<u8>)]
    pub rating: Option<f64>,
    /// Optional comment.
    #[serde(default)]
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn populated_renders_id_doc_or_null() {
        let id = UserId::new();
        let bare: Populated<UserId, UserName> = Populated::Id(id);
        assert_eq!(
            serde_json::to_value(&bare).unwrap_or_default(),
            serde_json::json!(id.to_string())
        );

        let doc: Populated<UserId, UserName> = Populated::Doc(UserName {
            id,
            name: "Alice".to_string(),
        });
        let json = serde_json::to_value(&doc).unwrap_or_default();
        assert_eq!(json["name"], "Alice");
        assert_eq!(json["_id"], id.to_string());

        let missing: Populated<UserId, UserName> = Populated::from_lookup(None);
        assert!(serde_json::to_value(&missing).unwrap_or_default().is_null());
    }
}
