use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_SALARY: f64 = 100_000.0;

/// Inputs to the generic calculator, as collected by the compensation form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompensationRequest {
    pub role: String,
    pub industry: String,
    pub company_type: String,
    pub level: String,
    pub location: String,
    pub experience_years: f64,
    #[serde(default)]
    pub skills: Vec<String>,
    /// `None` means `DEFAULT_BASE_SALARY`.
    #[serde(default)]
    pub base_salary: Option<f64>,
}

/// Rounded money range. `min ≤ median ≤ max` for non-negative inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: i64,
    pub max: i64,
    pub median: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Multipliers {
    pub industry: f64,
    pub company: f64,
    pub career: f64,
    pub experience: f64,
    pub location: f64,
    /// Fraction, not percent: 0.05 = +5%.
    pub skill_premium: f64,
}

/// Display-only context carried alongside the numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateMetadata {
    pub role: String,
    /// Table keys actually used (the default bucket when a fallback applied).
    pub industry: String,
    pub company_type: String,
    pub level: String,
    pub location: String,
    pub growth_rate: f64,
    pub benefits_score: u8,
    pub management_track: bool,
    /// Names of the lookups that fell back to their default, e.g. `["industry"]`.
    pub fallbacks_applied: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompensationEstimate {
    pub base: SalaryRange,
    pub equity: i64,
    pub bonus: i64,
    pub total: SalaryRange,
    pub multipliers: Multipliers,
    pub metadata: EstimateMetadata,
}

// ────────────────────────────────────────────────────────────────────────────
// Amazon variant
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmazonCompensationRequest {
    /// Exact level code, e.g. `L5`. Not case-normalized.
    pub level: String,
    pub location: String,
    pub experience_years: f64,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Absolute money band, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandRange {
    pub min: i64,
    pub max: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmazonMultipliers {
    pub location: f64,
    pub experience: f64,
    /// Fraction, uncapped.
    pub skill_premium: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmazonCompensationEstimate {
    pub level: String,
    pub level_label: String,
    pub title_label: String,
    pub base_salary: BandRange,
    pub rsu: BandRange,
    pub signing_bonus: BandRange,
    /// base + RSU + signing bonus.
    pub total_first_year: BandRange,
    pub multipliers: AmazonMultipliers,
}
