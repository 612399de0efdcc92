//! REST API layer: route handlers, DTOs, reference expansion, and router
//! composition.
//!
//! All endpoints are mounted at the root level.

pub mod dto;
pub mod expand;
pub mod extract;
pub mod handlers;
pub mod multipart;
pub mod openapi;


use axum::Router;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints, plus Swagger UI
/// under `/swagger-ui` when the `swagger-ui` feature is enabled.
pub fn build_router() -> Router<AppState> {
    let router = handlers::routes();

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        router.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        )
    };

    router
}
