//! Amazon calculator — fixed per-level bands scaled by location, experience and skills.
//!
//! Unlike the generic model, the level resolves to absolute money bands, and
//! there is no default level: an unknown code is `CompensationError::UnknownLevel`.
//! Level codes are matched exactly (`L5`, not `l5`).
//!
//! factor = location × experience × (1 + Σ skill premium / 100)
//!
//! Every band endpoint (base, RSU, signing bonus) is multiplied by `factor`
//! independently. The skill premium here is NOT capped, unlike the generic 25%.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compensation::calculator::round_money;
use crate::compensation::models::{
    AmazonCompensationEstimate, AmazonCompensationRequest, AmazonMultipliers, BandRange,
};
use crate::compensation::tables::{normalize_key, Resolved};
use crate::compensation::CompensationError;

pub const DEFAULT_AMAZON_LOCATION_MULTIPLIER: f64 = 0.9;
pub const DEFAULT_AMAZON_EXPERIENCE_MULTIPLIER: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmazonLevelBand {
    pub level_label: String,
    pub title_label: String,
    pub base_salary_range: BandRange,
    pub equity_range: BandRange,
    pub signing_bonus_range: BandRange,
}

/// Inclusive on both ends. Fractional years between buckets match nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExperienceBucket {
    pub min_years: f64,
    pub max_years: f64,
    pub multiplier: f64,
}

impl ExperienceBucket {
    fn contains(&self, years: f64) -> bool {
        years >= self.min_years && years <= self.max_years
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Built-in data (INR)
// ────────────────────────────────────────────────────────────────────────────

type BandRow = (&'static str, &'static str, &'static str, [i64; 6]);

/// (code, level label, title, [base min, base max, rsu min, rsu max, signing min, signing max])
const LEVELS: &[BandRow] = &[
    (
        "L4",
        "SDE I",
        "Software Development Engineer I",
        [1_800_000, 2_600_000, 600_000, 1_200_000, 200_000, 500_000],
    ),
    (
        "L5",
        "SDE II",
        "Software Development Engineer II",
        [3_000_000, 4_500_000, 1_500_000, 3_000_000, 500_000, 1_000_000],
    ),
    (
        "L6",
        "SDE III",
        "Senior Software Development Engineer",
        [5_000_000, 7_000_000, 3_000_000, 6_000_000, 800_000, 1_500_000],
    ),
    (
        "L7",
        "Principal SDE",
        "Principal Software Development Engineer",
        [7_500_000, 10_000_000, 8_000_000, 15_000_000, 1_500_000, 3_000_000],
    ),
    (
        "L8",
        "Senior Principal SDE",
        "Senior Principal Software Development Engineer",
        [11_000_000, 15_000_000, 15_000_000, 30_000_000, 2_500_000, 5_000_000],
    ),
];

const LOCATIONS: &[(&str, f64)] = &[
    ("bangalore", 1.0),
    ("gurgaon", 1.0),
    ("mumbai", 1.0),
    ("hyderabad", 0.95),
    ("delhi", 0.95),
    ("noida", 0.95),
    ("chennai", 0.9),
    ("pune", 0.9),
];

const EXPERIENCE_BUCKETS: &[ExperienceBucket] = &[
    ExperienceBucket { min_years: 0.0, max_years: 2.0, multiplier: 0.9 },
    ExperienceBucket { min_years: 3.0, max_years: 5.0, multiplier: 1.0 },
    ExperienceBucket { min_years: 6.0, max_years: 8.0, multiplier: 1.1 },
    ExperienceBucket { min_years: 9.0, max_years: 12.0, multiplier: 1.2 },
    ExperienceBucket { min_years: 13.0, max_years: 50.0, multiplier: 1.3 },
];

/// Percentage points, exact-case keys.
const SKILL_PREMIUMS: &[(&str, f64)] = &[
    ("Machine Learning", 15.0),
    ("Distributed Systems", 12.0),
    ("System Design", 10.0),
    ("AWS", 8.0),
    ("Java", 5.0),
    ("Python", 5.0),
    ("Data Structures", 5.0),
    ("Leadership Principles", 5.0),
];

// ────────────────────────────────────────────────────────────────────────────
// Band bundle
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct AmazonBandData {
    pub levels: Vec<(String, AmazonLevelBand)>,
    pub locations: Vec<(String, f64)>,
    pub experience_buckets: Vec<ExperienceBucket>,
    pub skill_premiums: Vec<(String, f64)>,
}

impl AmazonBandData {
    pub fn builtin() -> Self {
        let levels = LEVELS
            .iter()
            .map(|&(code, level_label, title_label, b)| {
                (
                    code.to_string(),
                    AmazonLevelBand {
                        level_label: level_label.to_string(),
                        title_label: title_label.to_string(),
                        base_salary_range: BandRange { min: b[0], max: b[1] },
                        equity_range: BandRange { min: b[2], max: b[3] },
                        signing_bonus_range: BandRange { min: b[4], max: b[5] },
                    },
                )
            })
            .collect();

        Self {
            levels,
            locations: LOCATIONS.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            experience_buckets: EXPERIENCE_BUCKETS.to_vec(),
            skill_premiums: SKILL_PREMIUMS
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        }
    }
}

/// Validated Amazon leveling data, shared read-only across requests.
#[derive(Debug, Clone)]
pub struct AmazonBands {
    levels: BTreeMap<String, AmazonLevelBand>,
    locations: BTreeMap<String, f64>,
    experience_buckets: Vec<ExperienceBucket>,
    skill_premiums: BTreeMap<String, f64>,
}

impl AmazonBands {
    /// Rejects inverted bands (min > max) and inverted experience buckets.
    pub fn new(data: AmazonBandData) -> Result<Self, CompensationError> {
        for (code, band) in &data.levels {
            let ranges = [
                ("base salary", band.base_salary_range),
                ("equity", band.equity_range),
                ("signing bonus", band.signing_bonus_range),
            ];
            if let Some((name, r)) = ranges.iter().find(|(_, r)| r.min > r.max) {
                return Err(CompensationError::InvalidTable(format!(
                    "level '{code}' {name} range is inverted ({} > {})",
                    r.min, r.max
                )));
            }
        }

        if let Some(b) = data
            .experience_buckets
            .iter()
            .find(|b| b.min_years > b.max_years)
        {
            return Err(CompensationError::InvalidTable(format!(
                "experience bucket [{}, {}] is inverted",
                b.min_years, b.max_years
            )));
        }

        Ok(Self {
            levels: data.levels.into_iter().collect(),
            locations: data
                .locations
                .into_iter()
                .map(|(k, v)| (normalize_key(&k), v))
                .collect(),
            experience_buckets: data.experience_buckets,
            skill_premiums: data.skill_premiums.into_iter().collect(),
        })
    }

    pub fn builtin() -> Result<Self, CompensationError> {
        Self::new(AmazonBandData::builtin())
    }

    /// Exact-match lookup. No fallback level.
    pub fn level_info(&self, code: &str) -> Option<&AmazonLevelBand> {
        self.levels.get(code)
    }

    pub fn levels(&self) -> &BTreeMap<String, AmazonLevelBand> {
        &self.levels
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
                debug!(
                    "Unknown Amazon location '{key}', using multiplier {DEFAULT_AMAZON_LOCATION_MULTIPLIER}"
                );
                Resolved {
                    key,
                    value: DEFAULT_AMAZON_LOCATION_MULTIPLIER,
                    fallback_applied: true,
                }
            }
        }
    }

    pub fn experience_multiplier(&self, years: f64) -> f64 {
        self.experience_buckets
            .iter()
            .find(|b| b.contains(years))
            .map(|b| b.multiplier)
            .unwrap_or(DEFAULT_AMAZON_EXPERIENCE_MULTIPLIER)
    }

    /// Sum of per-skill percentage points as a fraction. Unbounded.
    pub fn skill_premium(&self, skills: &[String]) -> f64 {
        let points: f64 = skills
            .iter()
            .map(|s| self.skill_premiums.get(s).copied().unwrap_or(0.0))
            .sum();
        points / 100.0
    }

    pub fn skill_premiums(&self) -> &BTreeMap<String, f64> {
        &self.skill_premiums
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Calculator
// ────────────────────────────────────────────────────────────────────────────

pub fn calculate_amazon_compensation(
    bands: &AmazonBands,
    request: &AmazonCompensationRequest,
) -> Result<AmazonCompensationEstimate, CompensationError> {
    let band = bands
        .level_info(&request.level)
        .ok_or_else(|| CompensationError::UnknownLevel(request.level.clone()))?;

    let location = bands.location_multiplier(&request.location).value;
    let experience = bands.experience_multiplier(request.experience_years);
    let skill_premium = bands.skill_premium(&request.skills);
    let factor = location * experience * (1.0 + skill_premium);

    let scale = |range: BandRange| BandRange {
        min: round_money(range.min as f64 * factor),
        max: round_money(range.max as f64 * factor),
    };

    let base_salary = scale(band.base_salary_range);
    let rsu = scale(band.equity_range);
    let signing_bonus = scale(band.signing_bonus_range);
    let total_first_year = BandRange {
        min: base_salary
            .min
            .saturating_add(rsu.min)
            .saturating_add(signing_bonus.min),
        max: base_salary
            .max
            .saturating_add(rsu.max)
            .saturating_add(signing_bonus.max),
    };

    debug!(
        "Amazon {} estimate: factor {factor:.4}, base {}-{}",
        request.level, base_salary.min, base_salary.max
    );

    Ok(AmazonCompensationEstimate {
        level: request.level.clone(),
        level_label: band.level_label.clone(),
        title_label: band.title_label.clone(),
        base_salary,
        rsu,
        signing_bonus,
        total_first_year,
        multipliers: AmazonMultipliers {
            location,
            experience,
            skill_premium,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bands() -> AmazonBands {
        AmazonBands::builtin().unwrap()
    }

    fn request(level: &str, location: &str, years: f64, skills: &[&str]) -> AmazonCompensationRequest {
        AmazonCompensationRequest {
            level: level.to_string(),
            location: location.to_string(),
            experience_years: years,
            skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_builtin_bands_validate() {
        assert!(AmazonBands::builtin().is_ok());
    }

    #[test]
    fn test_l5_bangalore_with_one_skill() {
        let est =
            calculate_amazon_compensation(&bands(), &request("L5", "Bangalore", 4.0, &["System Design"]))
                .unwrap();

        // factor = 1.0 × 1.0 × 1.10
        assert_eq!(est.level_label, "SDE II");
        assert_eq!(est.base_salary, BandRange { min: 3_300_000, max: 4_950_000 });
        assert_eq!(est.rsu, BandRange { min: 1_650_000, max: 3_300_000 });
        assert_eq!(est.signing_bonus, BandRange { min: 550_000, max: 1_100_000 });
        assert_eq!(
            est.total_first_year,
            BandRange {
                min: 3_300_000 + 1_650_000 + 550_000,
                max: 4_950_000 + 3_300_000 + 1_100_000,
            }
        );
        assert_eq!(est.multipliers.skill_premium, 0.1);
    }

    #[test]
    fn test_unknown_level_is_an_error_not_a_number() {
        let err = calculate_amazon_compensation(&bands(), &request("L99", "bangalore", 4.0, &[]))
            .unwrap_err();
        assert_eq!(err, CompensationError::UnknownLevel("L99".to_string()));
    }

    #[test]
    fn test_level_code_is_case_sensitive() {
        let result = calculate_amazon_compensation(&bands(), &request("l5", "bangalore", 4.0, &[]));
        assert!(matches!(result, Err(CompensationError::UnknownLevel(_))));
        assert!(bands().level_info("l5").is_none());
        assert!(bands().level_info("L5").is_some());
    }

    #[test]
    fn test_unknown_location_defaults_to_point_nine() {
        let b = bands();
        let r = b.location_multiplier("Kochi");
        assert!(r.fallback_applied);
        assert_eq!(r.value, 0.9);

        let est = calculate_amazon_compensation(&b, &request("L4", "Kochi", 4.0, &[])).unwrap();
        assert_eq!(est.multipliers.location, 0.9);
        assert_eq!(est.base_salary.min, 1_620_000);
    }

    #[test]
    fn test_experience_buckets_are_inclusive() {
        let b = bands();
        assert_eq!(b.experience_multiplier(0.0), 0.9);
        assert_eq!(b.experience_multiplier(2.0), 0.9);
        assert_eq!(b.experience_multiplier(3.0), 1.0);
        assert_eq!(b.experience_multiplier(8.0), 1.1);
        assert_eq!(b.experience_multiplier(12.0), 1.2);
        assert_eq!(b.experience_multiplier(50.0), 1.3);
    }

    #[test]
    fn test_experience_outside_buckets_defaults_to_one() {
        let b = bands();
        assert_eq!(b.experience_multiplier(2.5), 1.0);
        assert_eq!(b.experience_multiplier(-1.0), 1.0);
        assert_eq!(b.experience_multiplier(51.0), 1.0);
    }

    #[test]
    fn test_skill_premium_is_uncapped_and_exact_case() {
        let b = bands();
        let skills: Vec<String> = ["Machine Learning", "Distributed Systems", "System Design", "AWS"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let premium = b.skill_premium(&skills);
        assert!((premium - 0.45).abs() < 1e-12);
        assert!(premium > 0.25);

        assert_eq!(b.skill_premium(&["aws".to_string()]), 0.0);
        assert_eq!(b.skill_premium(&["Basket Weaving".to_string()]), 0.0);
    }

    #[test]
    fn test_inverted_band_rejected() {
        let mut data = AmazonBandData::builtin();
        data.levels[0].1.equity_range = BandRange { min: 10, max: 5 };
        let err = AmazonBands::new(data).unwrap_err();
        assert!(matches!(err, CompensationError::InvalidTable(_)));
    }

    #[test]
    fn test_all_levels_produce_ordered_bands() {
        let b = bands();
        for code in b.levels().keys() {
            let est = calculate_amazon_compensation(&b, &request(code, "pune", 10.0, &["Java"])).unwrap();
            assert!(est.base_salary.min <= est.base_salary.max);
            assert!(est.rsu.min <= est.rsu.max);
            assert!(est.signing_bonus.min <= est.signing_bonus.max);
            assert!(est.total_first_year.min <= est.total_first_year.max);
        }
    }
}
