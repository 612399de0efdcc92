//! PostgreSQL implementation of the document stores.
//!
//! Each collection is a table of JSONB documents keyed by UUID, with the
//! filter columns (`email`, `owner_id`, `organizer_id`, `user_id`) stored
//! alongside. Review appends lock the row with `SELECT ... FOR UPDATE`.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use tracing::info;

use super::{EventStore, TicketStore, UserStore, VenueStore};
use crate::config::MarketConfig;
use crate::domain::{Event, EventId, Review, Ticket, TicketId, User, UserId, Venue, VenueId};
use crate::error::MarketError;

/// PostgreSQL-backed store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects using the database settings in `config` and applies pending
    /// migrations.
    ///
    /// # Errors
    ///
    /// Returns a [`MarketError::Persistence`] if the database is unreachable
    /// or a migration fails.
    pub async fn connect(config: &MarketConfig) -> Result<Self, MarketError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| MarketError::Persistence(e.to_string()))?;
        info!("database migrations applied");

        Ok(Self::new(pool))
    }
}

/// Maps a unique-key violation on `users.email` to a registration error.
fn map_insert_user_error(err: sqlx::Error) -> MarketError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            MarketError::Unprocessable("Email already registered".to_string())
        }
        _ => MarketError::from(err),
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn insert_user(&self, user: User) -> Result<User, MarketError> {
        sqlx::query("INSERT INTO users (id, email, doc, created_at) VALUES ($1, $2, $3, $4)")
            .bind(*user.id.as_uuid())
            .bind(&user.email)
            .bind(Json(&user))
            .bind(user.created_at)
            .execute(&self.pool)
            .await
            .map_err(map_insert_user_error)?;
        Ok(user)
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, MarketError> {
        let row = sqlx::query_scalar::<_, Json<User>>("SELECT doc FROM users WHERE id = $1")
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|Json(user)| user))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, MarketError> {
        let row = sqlx::query_scalar::<_, Json<User>>("SELECT doc FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|Json(user)| user))
    }
}

#[async_trait]
impl VenueStore for PostgresStore {
    async fn insert_venue(&self, venue: Venue) -> Result<Venue, MarketError> {
        sqlx::query("INSERT INTO venues (id, owner_id, doc, created_at) VALUES ($1, $2, $3, $4)")
            .bind(*venue.id.as_uuid())
            .bind(*venue.owner.as_uuid())
            .bind(Json(&venue))
            .bind(venue.created_at)
            .execute(&self.pool)
            .await?;
        Ok(venue)
    }

    async fn find_venue(&self, id: VenueId) -> Result<Option<Venue>, MarketError> {
        let row = sqlx::query_scalar::<_, Json<Venue>>("SELECT doc FROM venues WHERE id = $1")
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|Json(venue)| venue))
    }

    async fn list_venues(&self, owner: Option<UserId>) -> Result<Vec<Venue>, MarketError> {
        let rows = if let Some(owner) = owner {
            sqlx::query_scalar::<_, Json<Venue>>(
                "SELECT doc FROM venues WHERE owner_id = $1 ORDER BY created_at ASC",
            )
            .bind(*owner.as_uuid())
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_scalar::<_, Json<Venue>>("SELECT doc FROM venues ORDER BY created_at ASC")
                .fetch_all(&self.pool)
                .await
        }?;
        Ok(rows.into_iter().map(|Json(venue)| venue).collect())
    }

    async fn update_venue(&self, venue: Venue) -> Result<Venue, MarketError> {
        let result = sqlx::query("UPDATE venues SET doc = $2 WHERE id = $1")
            .bind(*venue.id.as_uuid())
            .bind(Json(&venue))
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(MarketError::NotFound("Venue not found".to_string()));
        }
        Ok(venue)
    }

    async fn append_venue_review(
        &self,
        id: VenueId,
        review: Review,
    ) -> Result<Option<Venue>, MarketError> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_scalar::<_, Json<Venue>>(
            "SELECT doc FROM venues WHERE id = $1 FOR UPDATE",
        )
        .bind(*id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?;
        let Some(Json(mut venue)) = row else {
            return Ok(None);
        };

        venue.add_review(review);
        sqlx::query("UPDATE venues SET doc = $2 WHERE id = $1")
            .bind(*id.as_uuid())
            .bind(Json(&venue))
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(Some(venue))
    }

    async fn delete_venue(&self, id: VenueId) -> Result<bool, MarketError> {
        let result = sqlx::query("DELETE FROM venues WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl EventStore for PostgresStore {
    async fn insert_event(&self, event: Event) -> Result<Event, MarketError> {
        sqlx::query(
            "INSERT INTO events (id, organizer_id, doc, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(*event.id.as_uuid())
        .bind(*event.organizer.as_uuid())
        .bind(Json(&event))
        .bind(event.created_at)
        .execute(&self.pool)
        .await?;
        Ok(event)
    }

    async fn find_event(&self, id: EventId) -> Result<Option<Event>, MarketError> {
        let row = sqlx::query_scalar::<_, Json<Event>>("SELECT doc FROM events WHERE id = $1")
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|Json(event)| event))
    }

    async fn list_events(&self, organizer: Option<UserId>) -> Result<Vec<Event>, MarketError> {
        let rows = if let Some(organizer) = organizer {
            sqlx::query_scalar::<_, Json<Event>>(
                "SELECT doc FROM events WHERE organizer_id = $1 ORDER BY created_at ASC",
            )
            .bind(*organizer.as_uuid())
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_scalar::<_, Json<Event>>("SELECT doc FROM events ORDER BY created_at ASC")
                .fetch_all(&self.pool)
                .await
        }?;
        Ok(rows.into_iter().map(|Json(event)| event).collect())
    }

    async fn update_event(&self, event: Event) -> Result<Event, MarketError> {
        let result = sqlx::query("UPDATE events SET doc = $2 WHERE id = $1")
            .bind(*event.id.as_uuid())
            .bind(Json(&event))
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(MarketError::NotFound("Event not found".to_string()));
        }
        Ok(event)
    }

    async fn append_event_review(
        &self,
        id: EventId,
        review: Review,
    ) -> Result<Option<Event>, MarketError> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_scalar::<_, Json<Event>>(
            "SELECT doc FROM events WHERE id = $1 FOR UPDATE",
        )
        .bind(*id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?;
        let Some(Json(mut event)) = row else {
            return Ok(None);
        };

        event.add_review(review);
        sqlx::query("UPDATE events SET doc = $2 WHERE id = $1")
            .bind(*id.as_uuid())
            .bind(Json(&event))
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(Some(event))
    }

    async fn delete_event(&self, id: EventId) -> Result<bool, MarketError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TicketStore for PostgresStore {
    async fn insert_ticket(&self, ticket: Ticket) -> Result<Ticket, MarketError> {
        sqlx::query("INSERT INTO tickets (id, user_id, doc, created_at) VALUES ($1, $2, $3, $4)")
            .bind(*ticket.id.as_uuid())
            .bind(*ticket.user_id.as_uuid())
            .bind(Json(&ticket))
            .bind(ticket.created_at)
            .execute(&self.pool)
            .await?;
        Ok(ticket)
    }

    async fn list_tickets(&self) -> Result<Vec<Ticket>, MarketError> {
        let rows =
            sqlx::query_scalar::<_, Json<Ticket>>("SELECT doc FROM tickets ORDER BY created_at ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|Json(ticket)| ticket).collect())
    }

    async fn list_tickets_for_user(&self, user: UserId) -> Result<Vec<Ticket>, MarketError> {
        let rows = sqlx::query_scalar::<_, Json<Ticket>>(
            "SELECT doc FROM tickets WHERE user_id = $1 ORDER BY created_at ASC",
        )
        .bind(*user.as_uuid())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|Json(ticket)| ticket).collect())
    }

    async fn delete_ticket(&self, id: TicketId) -> Result<bool, MarketError> {
        let result = sqlx::query("DELETE FROM tickets WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
