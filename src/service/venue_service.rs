//! Venue service: listing, availability, reviews, and removal of venues.

use std::sync::Arc;

use tracing::{info, warn};

use super::form::{FormFields, whole_count};
use super::validate_rating;
use crate::auth::authorize;
use crate::domain::venue::dedup_amenities;
use crate::domain::{NewVenue, Review, Role, User, Venue, VenueId};
use crate::error::MarketError;
use crate::store::{ImageStore, ImageUpload, VenueStore};

/// Coordinates venue rules on top of the venue and image stores.
#[derive(Debug, Clone)]
pub struct VenueService {
    venues: Arc<dyn VenueStore>,
    images: Arc<dyn ImageStore>,
}

impl VenueService {
    /// Creates a new `VenueService`.
    #[must_use]
    pub fn new(venues: Arc<dyn VenueStore>, images: Arc<dyn ImageStore>) -> Self {
        Self { venues, images }
    }

    /// Lists a new venue owned by `owner`.
    ///
    /// # Errors
    ///
    /// - [`MarketError::Forbidden`] unless `owner` is a venue owner.
    /// - [`MarketError::Validation`] on malformed amenities or a missing
    ///   required field.
    pub async fn create_venue(
        &self,
        owner: &User,
        form: &FormFields,
        images: Vec<ImageUpload>,
    ) -> Result<Venue, MarketError> {
        authorize(owner, &[Role::VenueOwner])?;
        let input = parse_new_venue(form)?;
        let images = self.images.save_all(images).await?;

        let venue = self
            .venues
            .insert_venue(Venue::new(owner.id, input, images))
            .await?;
        info!(venue_id = %venue.id, owner = %owner.id, "venue created");
        Ok(venue)
    }

    /// Lists venues. With `mine`, only the caller's venues are returned.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Unauthenticated`] if `mine` is set without a
    /// caller.
    pub async fn list_venues(
        &self,
        caller: Option<&User>,
        mine: bool,
    ) -> Result<Vec<Venue>, MarketError> {
        let owner = if mine {
            let caller = caller.ok_or_else(|| {
                MarketError::Unauthenticated("Authentication required".to_string())
            })?;
            Some(caller.id)
        } else {
            None
        };
        self.venues.list_venues(owner).await
    }

    /// Loads a venue, `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Persistence`] on store failure.
    pub async fn get_venue(&self, id: VenueId) -> Result<Option<Venue>, MarketError> {
        self.venues.find_venue(id).await
    }

    /// Opens or closes a venue for new events.
    ///
    /// # Errors
    ///
    /// - [`MarketError::Forbidden`] unless the caller is a venue owner who
    ///   owns this venue.
    /// - [`MarketError::NotFound`] if the venue does not exist.
    pub async fn set_availability(
        &self,
        caller: &User,
        id: VenueId,
        availability: bool,
    ) -> Result<Venue, MarketError> {
        authorize(caller, &[Role::VenueOwner])?;
        let mut venue = self.owned_venue(caller, id).await?;
        venue.set_availability(availability);
        let venue = self.venues.update_venue(venue).await?;
        info!(venue_id = %id, availability, "venue availability changed");
        Ok(venue)
    }

    /// Appends a review from `author` and recomputes the venue rating.
    ///
    /// # Errors
    ///
    /// - [`MarketError::Validation`] if the rating is missing, fractional, or out of range.
    /// - [`MarketError::NotFound`] if the venue does not exist.
    pub async fn add_review(
        &self,
        author: &User,
        id: VenueId,
        rating: Option<f64>,
        comment: Option<String>,
    ) -> Result<Venue, MarketError> {
        let rating = validate_rating(rating)?;
        let review = Review::new(author.id, rating, comment.unwrap_or_default());
        let venue = self
            .venues
            .append_venue_review(id, review)
            .await?
            .ok_or_else(|| MarketError::NotFound("Venue not found".to_string()))?;
        info!(venue_id = %id, rating, average = venue.rating, "venue reviewed");
        Ok(venue)
    }

    /// Removes a venue owned by the caller.
    ///
    /// # Errors
    ///
    /// - [`MarketError::Forbidden`] unless the caller owns the venue.
    /// - [`MarketError::NotFound`] if the venue does not exist.
    pub async fn delete_venue(&self, caller: &User, id: VenueId) -> Result<(), MarketError> {
        authorize(caller, &[Role::VenueOwner])?;
        self.owned_venue(caller, id).await?;
        if !self.venues.delete_venue(id).await? {
            return Err(MarketError::NotFound("Venue not found".to_string()));
        }
        info!(venue_id = %id, "venue deleted");
        Ok(())
    }

    async fn owned_venue(&self, caller: &User, id: VenueId) -> Result<Venue, MarketError> {
        let venue = self
            .venues
            .find_venue(id)
            .await?
            .ok_or_else(|| MarketError::NotFound("Venue not found".to_string()))?;
        if !venue.is_owned_by(caller.id) {
            warn!(venue_id = %id, caller = %caller.id, "venue ownership check failed");
            return Err(MarketError::Forbidden("Not authorized".to_string()));
        }
        Ok(venue)
    }
}

/// Builds venue input from form fields.
///
/// `amenities` is a JSON array of strings. `availability` is true only when
/// it is the literal `"true"`.
///
/// # Errors
///
/// Returns [`MarketError::Validation`] on malformed amenities, a missing
/// required field, or a fractional capacity.
pub fn parse_new_venue(form: &FormFields) -> Result<NewVenue, MarketError> {
    let amenities = match form.text("amenities") {
        Some(raw) => serde_json::from_str::<Vec<String>>(raw)
            .map_err(|_| MarketError::validation("Invalid amenities format"))?,
        None => Vec::new(),
    };

    let (Some(name), Some(address), Some(capacity), Some(price_per_day)) = (
        form.text("name"),
        form.text("address"),
        form.positive_number("capacity"),
        form.positive_number("pricePerDay"),
    ) else {
        return Err(MarketError::validation("Missing required fields"));
    };
    let capacity = whole_count(capacity).ok_or_else(|| {
        MarketError::validation_with("Invalid capacity", "Capacity must be a whole number")
    })?;

    Ok(NewVenue {
        name: name.to_string(),
        address: address.to_string(),
        capacity,
        price_per_day,
        amenities: dedup_amenities(amenities),
        availability: form.flag("availability"),
        description: form.text("description").map(ToString::to_string),
    })
}
