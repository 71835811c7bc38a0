//! Reference tables for the generic compensation calculator.
//!
//! Industry, company-type, career-level and location keys are case-insensitive
//! (trimmed + lowercased). Skill keys are case-sensitive. Every lookup has a
//! documented fallback, so resolution never fails:
//!
//! | Table        | Default                  |
//! |--------------|--------------------------|
//! | Industry     | `technology`             |
//! | Company type | `mid-size company`       |
//! | Career level | `mid`                    |
//! | Location     | 1.0                      |
//! | Skill        | 0 percentage points      |
//! | Experience   | 1.0 when no bracket hits |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compensation::CompensationError;

pub const DEFAULT_INDUSTRY: &str = "technology";
pub const DEFAULT_COMPANY_TYPE: &str = "mid-size company";
pub const DEFAULT_CAREER_LEVEL: &str = "mid";
pub const DEFAULT_LOCATION_MULTIPLIER: f64 = 1.0;
pub const DEFAULT_EXPERIENCE_MULTIPLIER: f64 = 1.0;

// ────────────────────────────────────────────────────────────────────────────
// Profile types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndustryProfile {
    pub base_salary_multiplier: f64,
    /// Percent of adjusted base granted as equity (before company scaling).
    pub equity_percentage: f64,
    /// Percent of adjusted base paid as bonus (before company scaling).
    pub bonus_percentage: f64,
    /// Expected yearly industry growth, percent. Display only.
    pub growth_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompanyTypeProfile {
    pub base_salary_multiplier: f64,
    pub equity_multiplier: f64,
    pub bonus_multiplier: f64,
    /// 1 (minimal) – 5 (excellent).
    pub benefits_score: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CareerLevelProfile {
    pub multiplier: f64,
    pub equity_eligible: bool,
    pub bonus_eligible: bool,
    pub management_track: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExperienceBracket {
    pub min_years: f64,
    pub multiplier: f64,
}

/// Outcome of a table lookup.
///
/// `key` is the table key whose value was used. For industry, company type and
/// career level that is the default bucket when `fallback_applied` is set; the
/// location table has no default bucket, so `key` stays the normalized input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolved<T> {
    pub key: String,
    pub value: T,
    pub fallback_applied: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Built-in data
// ────────────────────────────────────────────────────────────────────────────

const fn industry(base: f64, equity: f64, bonus: f64, growth: f64) -> IndustryProfile {
    IndustryProfile {
        base_salary_multiplier: base,
        equity_percentage: equity,
        bonus_percentage: bonus,
        growth_rate: growth,
    }
}

const fn company(base: f64, equity: f64, bonus: f64, benefits: u8) -> CompanyTypeProfile {
    CompanyTypeProfile {
        base_salary_multiplier: base,
        equity_multiplier: equity,
        bonus_multiplier: bonus,
        benefits_score: benefits,
    }
}

const fn level(multiplier: f64, equity: bool, bonus: bool, management: bool) -> CareerLevelProfile {
    CareerLevelProfile {
        multiplier,
        equity_eligible: equity,
        bonus_eligible: bonus,
        management_track: management,
    }
}

const INDUSTRIES: &[(&str, IndustryProfile)] = &[
    ("technology", industry(1.2, 20.0, 15.0, 12.0)),
    ("finance", industry(1.3, 10.0, 25.0, 8.0)),
    ("healthcare", industry(1.1, 8.0, 10.0, 10.0)),
    ("consulting", industry(1.15, 5.0, 20.0, 7.0)),
    ("e-commerce", industry(1.15, 15.0, 12.0, 11.0)),
    ("manufacturing", industry(0.95, 5.0, 10.0, 4.0)),
    ("retail", industry(0.9, 5.0, 8.0, 3.0)),
    ("media", industry(1.0, 8.0, 10.0, 5.0)),
    ("energy", industry(1.1, 6.0, 12.0, 6.0)),
    ("education", industry(0.85, 0.0, 5.0, 3.0)),
    ("government", industry(0.9, 0.0, 5.0, 2.0)),
];

const COMPANY_TYPES: &[(&str, CompanyTypeProfile)] = &[
    ("startup", company(0.9, 2.0, 0.5, 3)),
    ("mid-size company", company(1.0, 1.0, 1.0, 4)),
    ("enterprise", company(1.15, 0.8, 1.2, 4)),
    ("fortune 500", company(1.25, 0.9, 1.3, 5)),
    ("consulting firm", company(1.1, 0.5, 1.5, 4)),
    ("government", company(0.85, 0.0, 0.5, 5)),
    ("non-profit", company(0.8, 0.0, 0.3, 3)),
];

const CAREER_LEVELS: &[(&str, CareerLevelProfile)] = &[
    ("intern", level(0.5, false, false, false)),
    ("entry", level(1.0, false, true, false)),
    ("mid", level(1.5, true, true, false)),
    ("senior", level(2.0, true, true, false)),
    ("lead", level(2.5, true, true, true)),
    ("director", level(3.2, true, true, true)),
    ("executive", level(4.5, true, true, true)),
];

const EXPERIENCE_BRACKETS: &[ExperienceBracket] = &[
    ExperienceBracket { min_years: 0.0, multiplier: 1.0 },
    ExperienceBracket { min_years: 2.0, multiplier: 1.2 },
    ExperienceBracket { min_years: 5.0, multiplier: 1.5 },
    ExperienceBracket { min_years: 8.0, multiplier: 1.8 },
    ExperienceBracket { min_years: 10.0, multiplier: 2.0 },
    ExperienceBracket { min_years: 15.0, multiplier: 2.3 },
];

const LOCATIONS: &[(&str, f64)] = &[
    ("bangalore", 1.0),
    ("mumbai", 1.05),
    ("delhi", 1.0),
    ("gurgaon", 1.0),
    ("noida", 0.95),
    ("hyderabad", 0.95),
    ("pune", 0.9),
    ("chennai", 0.9),
    ("kolkata", 0.85),
    ("ahmedabad", 0.85),
    ("remote", 0.95),
];

/// Percentage points per skill. Display data: the generic calculator only
/// counts skills, it does not price them individually.
const SKILL_PREMIUMS: &[(&str, f64)] = &[
    ("Machine Learning", 15.0),
    ("Security", 12.0),
    ("Cloud Architecture", 12.0),
    ("System Design", 10.0),
    ("Data Engineering", 10.0),
    ("Rust", 10.0),
    ("Kubernetes", 8.0),
    ("Go", 8.0),
    ("Leadership", 8.0),
    ("React", 5.0),
];

// ────────────────────────────────────────────────────────────────────────────
// Table bundle
// ────────────────────────────────────────────────────────────────────────────

/// Raw table contents, prior to validation.
#[derive(Debug, Clone, Default)]
pub struct TableData {
    pub industries: Vec<(String, IndustryProfile)>,
    pub company_types: Vec<(String, CompanyTypeProfile)>,
    pub career_levels: Vec<(String, CareerLevelProfile)>,
    pub experience_brackets: Vec<ExperienceBracket>,
    pub locations: Vec<(String, f64)>,
    pub skill_premiums: Vec<(String, f64)>,
}

impl TableData {
    pub fn builtin() -> Self {
        fn owned<T: Copy>(rows: &[(&str, T)]) -> Vec<(String, T)> {
            rows.iter().map(|(k, v)| (k.to_string(), *v)).collect()
        }

        Self {
            industries: owned(INDUSTRIES),
            company_types: owned(COMPANY_TYPES),
            career_levels: owned(CAREER_LEVELS),
            experience_brackets: EXPERIENCE_BRACKETS.to_vec(),
            locations: owned(LOCATIONS),
            skill_premiums: owned(SKILL_PREMIUMS),
        }
    }
}

/// Validated, read-only lookup tables for the generic calculator.
///
/// Built once at startup and shared behind an `Arc` in `AppState`.
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    industries: BTreeMap<String, IndustryProfile>,
    company_types: BTreeMap<String, CompanyTypeProfile>,
    career_levels: BTreeMap<String, CareerLevelProfile>,
    /// Sorted ascending by `min_years`.
    experience_brackets: Vec<ExperienceBracket>,
    locations: BTreeMap<String, f64>,
    skill_premiums: BTreeMap<String, f64>,
    default_industry: IndustryProfile,
    default_company_type: CompanyTypeProfile,
    default_career_level: CareerLevelProfile,
}

impl ReferenceTables {
    /// Validates and indexes `data`.
    ///
    /// Fails if a default bucket is missing, an industry multiplier is not
    /// strictly positive, a benefits score is outside 1–5, or a bracket
    /// threshold is not finite.
    pub fn new(data: TableData) -> Result<Self, CompensationError> {
        let industries: BTreeMap<_, _> = data
            .industries
            .into_iter()
            .map(|(k, v)| (normalize_key(&k), v))
            .collect();
        let company_types: BTreeMap<_, _> = data
            .company_types
            .into_iter()
            .map(|(k, v)| (normalize_key(&k), v))
            .collect();
        let career_levels: BTreeMap<_, _> = data
            .career_levels
            .into_iter()
            .map(|(k, v)| (normalize_key(&k), v))
            .collect();
        let locations: BTreeMap<_, _> = data
            .locations
            .into_iter()
            .map(|(k, v)| (normalize_key(&k), v))
            .collect();
        let skill_premiums: BTreeMap<_, _> = data.skill_premiums.into_iter().collect();

        for (key, profile) in &industries {
            let m = profile.base_salary_multiplier;
            if !(m.is_finite() && m > 0.0) {
                return Err(CompensationError::InvalidTable(format!(
                    "industry '{key}' has non-positive base multiplier {m}"
                )));
            }
        }

        for (key, profile) in &company_types {
            if !(1..=5).contains(&profile.benefits_score) {
                return Err(CompensationError::InvalidTable(format!(
                    "company type '{key}' has benefits score {} outside 1-5",
                    profile.benefits_score
                )));
            }
        }

        let mut experience_brackets = data.experience_brackets;
        if let Some(bad) = experience_brackets.iter().find(|b| !b.min_years.is_finite()) {
            return Err(CompensationError::InvalidTable(format!(
                "experience bracket threshold {} is not finite",
                bad.min_years
            )));
        }
        experience_brackets.sort_by(|a, b| a.min_years.total_cmp(&b.min_years));

        let default_industry = *industries
            .get(DEFAULT_INDUSTRY)
            .ok_or_else(|| missing_default("industry", DEFAULT_INDUSTRY))?;
        let default_company_type = *company_types
            .get(DEFAULT_COMPANY_TYPE)
            .ok_or_else(|| missing_default("company type", DEFAULT_COMPANY_TYPE))?;
        let default_career_level = *career_levels
            .get(DEFAULT_CAREER_LEVEL)
            .ok_or_else(|| missing_default("career level", DEFAULT_CAREER_LEVEL))?;

        Ok(Self {
            industries,
            company_types,
            career_levels,
            experience_brackets,
            locations,
            skill_premiums,
            default_industry,
            default_company_type,
            default_career_level,
        })
    }

    pub fn builtin() -> Result<Self, CompensationError> {
        Self::new(TableData::builtin())
    }

    // ── Resolution (never fails) ────────────────────────────────────────────

    pub fn industry_info(&self, industry: &str) -> Resolved<IndustryProfile> {
        resolve_or_default(
            &self.industries,
            "industry",
            industry,
            DEFAULT_INDUSTRY,
            self.default_industry,
        )
    }

    pub fn company_type_info(&self, company_type: &str) -> Resolved<CompanyTypeProfile> {
        resolve_or_default(
            &self.company_types,
            "company type",
            company_type,
            DEFAULT_COMPANY_TYPE,
            self.default_company_type,
        )
    }

    pub fn career_level_info(&self, level: &str) -> Resolved<CareerLevelProfile> {
        resolve_or_default(
            &self.career_levels,
            "career level",
            level,
            DEFAULT_CAREER_LEVEL,
            self.default_career_level,
        )
    }

    pub fn location_multiplier(&self, location: &str) -> Resolved<f64> {
        let key = normalize_key(location);
        match self.locations.get(&key) {
            Some(&value) => Resolved {
                key,
                value,
                fallback_applied: false,
            },
            None => {
                debug!("Unknown location '{key}', using multiplier {DEFAULT_LOCATION_MULTIPLIER}");
                Resolved {
                    key,
                    value: DEFAULT_LOCATION_MULTIPLIER,
                    fallback_applied: true,
                }
            }
        }
    }

    /// The bracket with the largest `min_years` not exceeding `years`.
    /// `None` for negative or NaN input when no threshold is satisfied.
    pub fn experience_bracket(&self, years: f64) -> Option<ExperienceBracket> {
        self.experience_brackets
            .iter()
            .rev()
            .find(|b| b.min_years <= years)
            .copied()
    }

    pub fn experience_multiplier(&self, years: f64) -> f64 {
        self.experience_bracket(years)
            .map(|b| b.multiplier)
            .unwrap_or(DEFAULT_EXPERIENCE_MULTIPLIER)
    }

    // ── Listing ─────────────────────────────────────────────────────────────

    /// Percentage points per skill, exact-case keys.
    pub fn skill_premiums(&self) -> &BTreeMap<String, f64> {
        &self.skill_premiums
    }

    pub fn industries(&self) -> &BTreeMap<String, IndustryProfile> {
        &self.industries
    }

    pub fn company_types(&self) -> &BTreeMap<String, CompanyTypeProfile> {
        &self.company_types
    }

    pub fn career_levels(&self) -> &BTreeMap<String, CareerLevelProfile> {
        &self.career_levels
    }

    pub fn locations(&self) -> &BTreeMap<String, f64> {
        &self.locations
    }

    pub fn experience_brackets(&self) -> &[ExperienceBracket] {
        &self.experience_brackets
    }
}

/// Case-insensitive key form shared by every table except skills.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn resolve_or_default<T: Copy>(
    table: &BTreeMap<String, T>,
    table_name: &str,
    raw: &str,
    default_key: &str,
    default: T,
) -> Resolved<T> {
    let key = normalize_key(raw);
    match table.get(&key) {
        Some(&value) => Resolved {
            key,
            value,
            fallback_applied: false,
        },
        None => {
            debug!("Unknown {table_name} '{key}', falling back to '{default_key}'");
            Resolved {
                key: default_key.to_string(),
                value: default,
                fallback_applied: true,
            }
        }
    }
}

fn missing_default(table_name: &str, key: &str) -> CompensationError {
    CompensationError::InvalidTable(format!("{table_name} table is missing default '{key}'"))
}
