//! Venues listed by venue owners.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::review::{Review, mean_rating};
use super::{UserId, VenueId};

/// Validated input for a new venue listing.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVenue {
    /// Venue name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Maximum number of attendees.
    pub capacity: u32,
    /// Rental price for one day.
    pub price_per_day: f64,
    /// Amenities offered, without duplicates.
    pub amenities: Vec<String>,
    /// Whether the venue accepts new events.
    pub availability: bool,
    /// Optional description.
    pub description: Option<String>,
}

/// A venue as persisted in the venue store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    /// Unique identifier.
    #[serde(rename = "_id")]
    pub id: VenueId,
    /// Owning venue owner. Immutable after creation.
    pub owner: UserId,
    /// Venue name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Maximum number of attendees.
    pub capacity: u32,
    /// Rental price for one day.
    pub price_per_day: f64,
    /// Amenities offered.
    #[serde(default)]
    pub amenities: Vec<String>,
    /// Whether the venue accepts new events.
    pub availability: bool,
    /// Stored image references.
    #[serde(default)]
    pub images: Vec<String>,
    /// Mean of all review ratings.
    #[serde(default)]
    pub rating: f64,
    /// Reviews in insertion order.
    #[serde(default)]
    pub reviews: Vec<Review>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Venue {
    /// Creates a venue owned by `owner` with no reviews yet.
    #[must_use]
    pub fn new(owner: UserId, input: NewVenue, images: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: VenueId::new(),
            owner,
            name: input.name,
            address: input.address,
            description: input.description,
            capacity: input.capacity,
            price_per_day: input.price_per_day,
            amenities: input.amenities,
            availability: input.availability,
            images,
            rating: 0.0,
            reviews: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns `true` if `user` owns this venue.
    #[must_use]
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner == user
    }

    /// Appends a review and recomputes the mean rating over the full list.
    pub fn add_review(&mut self, review: Review) {
        self.reviews.push(review);
        self.rating = mean_rating(&self.reviews);
        self.updated_at = Utc::now();
    }

    /// Sets the availability flag.
    pub fn set_availability(&mut self, availability: bool) {
        self.availability = availability;
        self.updated_at = Utc::now();
    }
}

/// Removes duplicate and blank amenities, keeping first occurrences.
#[must_use]
pub fn dedup_amenities(amenities: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(amenities.len());
    for amenity in amenities {
        let amenity = amenity.trim().to_string();
        if !amenity.is_empty() && !out.contains(&amenity) {
            out.push(amenity);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venue() -> Venue {
        Venue::new(
            UserId::new(),
            NewVenue {
                name: "Grand Hall".to_string(),
                address: "1 Main St".to_string(),
                capacity: 100,
                price_per_day: 500.0,
                amenities: vec!["wifi".to_string()],
                availability: true,
                description: None,
            },
            Vec::new(),
        )
    }

    #[test]
    fn new_venue_starts_unrated() {
        let v = venue();
        assert!(v.rating.abs() < f64::EPSILON);
        assert!(v.reviews.is_empty());
    }

    #[test]
    fn rating_tracks_mean_after_every_review() {
        let mut v = venue();
        let ratings = [5u8, 3, 4, 1];
        for (i, r) in ratings.iter().enumerate() {
            v.add_review(Review::new(UserId::new(), *r, String::new()));
            let seen = ratings.get(..=i).unwrap_or_default();
            let expected =
                seen.iter().map(|&x| f64::from(x)).sum::<f64>() / f64::from(u32::try_from(i + 1).unwrap_or(1));
            assert!((v.rating - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn ownership_check() {
        let v = venue();
        assert!(v.is_owned_by(v.owner));
        assert!(!v.is_owned_by(UserId::new()));
    }

    #[test]
    fn amenities_are_deduplicated() {
        let out = dedup_amenities(vec![
            "wifi".to_string(),
            " parking ".to_string(),
            "wifi".to_string(),
            String::new(),
        ]);
        assert_eq!(out, vec!["wifi".to_string(), "parking".to_string()]);
    }
}
