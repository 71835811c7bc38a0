//! Axum route handlers for the Compensation and Reference APIs.

use std::collections::BTreeMap;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::compensation::amazon::AmazonLevelBand;
use crate::compensation::models::{
    AmazonCompensationEstimate, AmazonCompensationRequest, CompensationEstimate,
    CompensationRequest,
};
use crate::compensation::tables::{
    CareerLevelProfile, CompanyTypeProfile, ExperienceBracket, IndustryProfile, Resolved,
};
use crate::compensation::{
    calculate_amazon_compensation, calculate_compensation, CompensationError,
};
use crate::errors::AppError;
use crate::state::AppState;

/// Upper bound on listed skills per request.
pub const MAX_SKILLS: usize = 50;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Envelope for calculator output. The estimate itself is a pure function of
/// the request; only the envelope varies between calls.
#[derive(Debug, Serialize)]
pub struct EstimateResponse<T> {
    pub request_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub estimate: T,
}

impl<T> EstimateResponse<T> {
    fn new(estimate: T) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            estimate,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExperienceInfo {
    pub years: f64,
    pub multiplier: f64,
    pub bracket: Option<ExperienceBracket>,
}

fn validate_skills(skills: &[String]) -> Result<(), AppError> {
    if skills.len() > MAX_SKILLS {
        return Err(AppError::Validation(format!(
            "at most {MAX_SKILLS} skills may be listed, got {}",
            skills.len()
        )));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Calculators
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/compensation/estimate
///
/// Generic multi-factor estimate. Unknown categories fall back to defaults and
/// are listed in `metadata.fallbacks_applied`.
pub async fn handle_estimate(
    State(state): State<AppState>,
    payload: Result<Json<CompensationRequest>, JsonRejection>,
) -> Result<Json<EstimateResponse<CompensationEstimate>>, AppError> {
    let Json(mut request) = payload?;
    if request.role.trim().is_empty() {
        return Err(AppError::Validation("role cannot be empty".to_string()));
    }
    validate_skills(&request.skills)?;

    if request.base_salary.is_none() {
        request.base_salary = Some(state.config.default_base_salary);
    }

    let estimate = calculate_compensation(&state.tables, &request)?;
    Ok(Json(EstimateResponse::new(estimate)))
}

/// POST /api/v1/compensation/amazon
///
/// Band-based Amazon estimate. Unknown level codes return 404 UNKNOWN_LEVEL.
pub async fn handle_amazon_estimate(
    State(state): State<AppState>,
    payload: Result<Json<AmazonCompensationRequest>, JsonRejection>,
) -> Result<Json<EstimateResponse<AmazonCompensationEstimate>>, AppError> {
    let Json(request) = payload?;
    validate_skills(&request.skills)?;

    let estimate = calculate_amazon_compensation(&state.amazon, &request)?;
    Ok(Json(EstimateResponse::new(estimate)))
}

// ────────────────────────────────────────────────────────────────────────────
// Reference data
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/reference/industries
pub async fn handle_list_industries(
    State(state): State<AppState>,
) -> Json<BTreeMap<String, IndustryProfile>> {
    Json(state.tables.industries().clone())
}

/// GET /api/v1/reference/industries/:name
pub async fn handle_get_industry(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<Resolved<IndustryProfile>> {
    Json(state.tables.industry_info(&name))
}

/// GET /api/v1/reference/company-types
pub async fn handle_list_company_types(
    State(state): State<AppState>,
) -> Json<BTreeMap<String, CompanyTypeProfile>> {
    Json(state.tables.company_types().clone())
}

/// GET /api/v1/reference/company-types/:name
pub async fn handle_get_company_type(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<Resolved<CompanyTypeProfile>> {
    Json(state.tables.company_type_info(&name))
}

/// GET /api/v1/reference/career-levels
pub async fn handle_list_career_levels(
    State(state): State<AppState>,
) -> Json<BTreeMap<String, CareerLevelProfile>> {
    Json(state.tables.career_levels().clone())
}

/// GET /api/v1/reference/career-levels/:name
pub async fn handle_get_career_level(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<Resolved<CareerLevelProfile>> {
    Json(state.tables.career_level_info(&name))
}

/// GET /api/v1/reference/locations
pub async fn handle_list_locations(State(state): State<AppState>) -> Json<BTreeMap<String, f64>> {
    Json(state.tables.locations().clone())
}

/// GET /api/v1/reference/locations/:city
pub async fn handle_get_location(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Json<Resolved<f64>> {
    Json(state.tables.location_multiplier(&city))
}

/// GET /api/v1/reference/experience
pub async fn handle_list_experience_brackets(
    State(state): State<AppState>,
) -> Json<Vec<ExperienceBracket>> {
    Json(state.tables.experience_brackets().to_vec())
}

/// GET /api/v1/reference/experience/:years
pub async fn handle_get_experience(
    State(state): State<AppState>,
    years: Result<Path<f64>, PathRejection>,
) -> Result<Json<ExperienceInfo>, AppError> {
    let Path(years) = years?;
    if !years.is_finite() {
        return Err(AppError::Validation(format!(
            "years must be a finite number, got {years}"
        )));
    }

    Ok(Json(ExperienceInfo {
        years,
        multiplier: state.tables.experience_multiplier(years),
        bracket: state.tables.experience_bracket(years),
    }))
}

/// GET /api/v1/reference/skills
pub async fn handle_list_skill_premiums(
    State(state): State<AppState>,
) -> Json<BTreeMap<String, f64>> {
    Json(state.tables.skill_premiums().clone())
}

/// GET /api/v1/reference/amazon/levels
pub async fn handle_list_amazon_levels(
    State(state): State<AppState>,
) -> Json<BTreeMap<String, AmazonLevelBand>> {
    Json(state.amazon.levels().clone())
}

/// GET /api/v1/reference/amazon/levels/:code
pub async fn handle_get_amazon_level(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<AmazonLevelBand>, AppError> {
    state
        .amazon
        .level_info(&code)
        .cloned()
        .map(Json)
        .ok_or_else(|| CompensationError::UnknownLevel(code).into())
}

/// GET /api/v1/reference/amazon/skills
pub async fn handle_list_amazon_skill_premiums(
    State(state): State<AppState>,
) -> Json<BTreeMap<String, f64>> {
    Json(state.amazon.skill_premiums().clone())
}
