//! Data Transfer Objects for REST request/response serialization.
//!
//! Response DTOs mirror the stored documents with camelCase keys and `_id`
//! identifiers. References to other documents are rendered through
//! [`Populated`], so the same DTO serves both raw and expanded views.

pub mod common_dto;
pub mod event_dto;
pub mod ticket_dto;
pub mod user_dto;
pub mod venue_dto;

pub use common_dto::*;
pub use event_dto::*;
pub use ticket_dto::*;
pub use user_dto::*;
pub use venue_dto::*;
