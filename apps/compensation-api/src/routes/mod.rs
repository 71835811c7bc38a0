pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::compensation::handlers;
use crate::errors::AppError;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Calculators
        .route(
            "/api/v1/compensation/estimate",
            post(handlers::handle_estimate),
        )
        .route(
            "/api/v1/compensation/amazon",
            post(handlers::handle_amazon_estimate),
        )
        // Reference data (form dropdowns, explanations)
        .route(
            "/api/v1/reference/industries",
            get(handlers::handle_list_industries),
        )
        .route(
            "/api/v1/reference/industries/:name",
            get(handlers::handle_get_industry),
        )
        .route(
            "/api/v1/reference/company-types",
            get(handlers::handle_list_company_types),
        )
        .route(
            "/api/v1/reference/company-types/:name",
            get(handlers::handle_get_company_type),
        )
        .route(
            "/api/v1/reference/career-levels",
            get(handlers::handle_list_career_levels),
        )
        .route(
            "/api/v1/reference/career-levels/:name",
            get(handlers::handle_get_career_level),
        )
        .route(
            "/api/v1/reference/locations",
            get(handlers::handle_list_locations),
        )
        .route(
            "/api/v1/reference/locations/:city",
            get(handlers::handle_get_location),
        )
        .route(
            "/api/v1/reference/experience",
            get(handlers::handle_list_experience_brackets),
        )
        .route(
            "/api/v1/reference/experience/:years",
            get(handlers::handle_get_experience),
        )
        .route(
            "/api/v1/reference/skills",
            get(handlers::handle_list_skill_premiums),
        )
        .route(
            "/api/v1/reference/amazon/levels",
            get(handlers::handle_list_amazon_levels),
        )
        .route(
            "/api/v1/reference/amazon/levels/:code",
            get(handlers::handle_get_amazon_level),
        )
        .route(
            "/api/v1/reference/amazon/skills",
            get(handlers::handle_list_amazon_skill_premiums),
        )
        .fallback(not_found)
        .with_state(state)
}
