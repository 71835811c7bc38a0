//! Generic compensation calculator — multiplicative factor model over `ReferenceTables`.
//!
//! Algorithm:
//! 1. Resolve industry, company type, career level and location (with fallbacks).
//! 2. Experience multiplier = bracket with the largest threshold ≤ years (1.0 if none).
//! 3. Skill premium = min(0.25, 0.05 × skill count). Skill identity is ignored.
//! 4. adjusted = base × industry × company × career × experience × location × (1 + premium)
//! 5. equity = adjusted × industry.equity% × company.equity_multiplier   (if equity eligible)
//! 6. bonus  = adjusted × industry.bonus%  × company.bonus_multiplier    (if bonus eligible)
//! 7. base range = [0.9, 1.2] × adjusted, median = adjusted; total = base + equity + bonus.
//!
//! All money values are rounded to the nearest integer. Negative salaries and
//! experience are not rejected; they flow through the arithmetic unchanged.
//! Salaries large enough to push any amount past `MONEY_LIMIT` are rejected.

use tracing::debug;

use crate::compensation::models::{
    CompensationEstimate, CompensationRequest, EstimateMetadata, Multipliers, SalaryRange,
    DEFAULT_BASE_SALARY,
};
use crate::compensation::tables::ReferenceTables;
use crate::compensation::CompensationError;

pub const SKILL_PREMIUM_PER_SKILL: f64 = 0.05;
pub const SKILL_PREMIUM_CAP: f64 = 0.25;

const BASE_RANGE_LOW: f64 = 0.9;
const BASE_RANGE_HIGH: f64 = 1.2;

/// 2^53: past this, whole-unit amounts are no longer exact in f64.
pub const MONEY_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Flat premium per listed skill, capped at 25%.
pub fn capped_skill_premium(skill_count: usize) -> f64 {
    (skill_count as f64 * SKILL_PREMIUM_PER_SKILL).min(SKILL_PREMIUM_CAP)
}

pub fn calculate_compensation(
    tables: &ReferenceTables,
    request: &CompensationRequest,
) -> Result<CompensationEstimate, CompensationError> {
    let base_salary = request.base_salary.unwrap_or(DEFAULT_BASE_SALARY);
    if !base_salary.is_finite() {
        return Err(CompensationError::InvalidInput(format!(
            "base_salary must be a finite number, got {base_salary}"
        )));
    }

    let industry = tables.industry_info(&request.industry);
    let company = tables.company_type_info(&request.company_type);
    let career = tables.career_level_info(&request.level);
    let location = tables.location_multiplier(&request.location);
    let experience = tables.experience_multiplier(request.experience_years);
    let skill_premium = capped_skill_premium(request.skills.len());

    let adjusted_base = base_salary
        * industry.value.base_salary_multiplier
        * company.value.base_salary_multiplier
        * career.value.multiplier
        * experience
        * location.value
        * (1.0 + skill_premium);

    let equity = if career.value.equity_eligible {
        adjusted_base * (industry.value.equity_percentage / 100.0) * company.value.equity_multiplier
    } else {
        0.0
    };

    let bonus = if career.value.bonus_eligible {
        adjusted_base * (industry.value.bonus_percentage / 100.0) * company.value.bonus_multiplier
    } else {
        0.0
    };

    let peak = (adjusted_base * BASE_RANGE_HIGH).abs() + equity.abs() + bonus.abs();
    if !peak.is_finite() || peak > MONEY_LIMIT {
        return Err(CompensationError::InvalidInput(format!(
            "base_salary {base_salary} yields amounts beyond the supported range"
        )));
    }

    let equity = round_money(equity);
    let bonus = round_money(bonus);
    let base = SalaryRange {
        min: round_money(adjusted_base * BASE_RANGE_LOW),
        max: round_money(adjusted_base * BASE_RANGE_HIGH),
        median: round_money(adjusted_base),
    };

    let total = SalaryRange {
        min: base.min + equity + bonus,
        max: base.max + equity + bonus,
        median: base.median + equity + bonus,
    };

    let fallbacks_applied = [
        ("industry", industry.fallback_applied),
        ("company_type", company.fallback_applied),
        ("level", career.fallback_applied),
        ("location", location.fallback_applied),
    ]
    .into_iter()
    .filter(|(_, applied)| *applied)
    .map(|(name, _)| name.to_string())
    .collect();

    debug!(
        "Estimated '{}': base median {}, equity {equity}, bonus {bonus}",
        request.role, base.median
    );

    Ok(CompensationEstimate {
        base,
        equity,
        bonus,
        total,
        multipliers: Multipliers {
            industry: industry.value.base_salary_multiplier,
            company: company.value.base_salary_multiplier,
            career: career.value.multiplier,
            experience,
            location: location.value,
            skill_premium,
        },
        metadata: EstimateMetadata {
            role: request.role.clone(),
            industry: industry.key,
            company_type: company.key,
            level: career.key,
            location: location.key,
            growth_rate: industry.value.growth_rate,
            benefits_score: company.value.benefits_score,
            management_track: career.value.management_track,
            fallbacks_applied,
        },
    })
}

/// Nearest integer, saturating at the i64 bounds.
pub(crate) fn round_money(value: f64) -> i64 {
    value.round() as i64
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> ReferenceTables {
        ReferenceTables::builtin().unwrap()
    }

    fn request(
        industry: &str,
        company_type: &str,
        level: &str,
        location: &str,
        experience_years: f64,
        skills: &[&str],
    ) -> CompensationRequest {
        CompensationRequest {
            role: "Software Engineer".to_string(),
            industry: industry.to_string(),
            company_type: company_type.to_string(),
            level: level.to_string(),
            location: location.to_string(),
            experience_years,
            skills: skills.iter().map(|s| s.to_string()).collect(),
            base_salary: Some(100_000.0),
        }
    }

    #[test]
    fn test_reference_example_end_to_end() {
        let req = request("technology", "startup", "mid", "bangalore", 5.0, &["System Design"]);
        let est = calculate_compensation(&tables(), &req).unwrap();

        assert_eq!(est.multipliers.industry, 1.2);
        assert_eq!(est.multipliers.company, 0.9);
        assert_eq!(est.multipliers.career, 1.5);
        assert_eq!(est.multipliers.experience, 1.5);
        assert_eq!(est.multipliers.location, 1.0);
        assert_eq!(est.multipliers.skill_premium, 0.05);

        assert_eq!(est.base.median, 255_150);
        assert_eq!(est.base.min, 229_635);
        assert_eq!(est.base.max, 306_180);
        assert_eq!(est.equity, 102_060);
        assert_eq!(est.bonus, 19_136);
        assert_eq!(est.total.median, 376_346);
        assert_eq!(est.total.min, 229_635 + 102_060 + 19_136);
        assert_eq!(est.total.max, 306_180 + 102_060 + 19_136);
        assert!(est.metadata.fallbacks_applied.is_empty());
    }

    #[test]
    fn test_identical_inputs_identical_outputs() {
        let t = tables();
        let req = request("finance", "fortune 500", "senior", "mumbai", 9.0, &["Rust", "Go"]);
        let a = calculate_compensation(&t, &req).unwrap();
        let b = calculate_compensation(&t, &req).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_range_ordering_and_total_identity_across_tables() {
        let t = tables();
        for industry in t.industries().keys() {
            for company in t.company_types().keys() {
                for level in t.career_levels().keys() {
                    let req = request(industry, company, level, "pune", 6.0, &["Go"]);
                    let est = calculate_compensation(&t, &req).unwrap();
                    assert!(est.base.min <= est.base.median);
                    assert!(est.base.median <= est.base.max);
                    assert_eq!(est.total.median, est.base.median + est.equity + est.bonus);
                    assert_eq!(est.total.min, est.base.min + est.equity + est.bonus);
                    assert_eq!(est.total.max, est.base.max + est.equity + est.bonus);
                }
            }
        }
    }

    #[test]
    fn test_skill_premium_capped_at_25_percent() {
        for n in 0..12 {
            let premium = capped_skill_premium(n);
            assert!(premium <= SKILL_PREMIUM_CAP);
            assert_eq!(premium, (0.05 * n as f64).min(0.25));
        }
        assert_eq!(capped_skill_premium(10), 0.25);
    }

    #[test]
    fn test_skill_identity_does_not_matter() {
        let t = tables();
        let known = request("technology", "startup", "mid", "bangalore", 5.0, &["Machine Learning", "Rust"]);
        let unknown = request("technology", "startup", "mid", "bangalore", 5.0, &["Juggling", "Origami"]);
        let a = calculate_compensation(&t, &known).unwrap();
        let b = calculate_compensation(&t, &unknown).unwrap();
        assert_eq!(a.base, b.base);
        assert_eq!(a.multipliers.skill_premium, 0.1);
    }

    #[test]
    fn test_ineligible_levels_get_no_equity_or_bonus() {
        let t = tables();
        for (name, profile) in t.career_levels() {
            let req = request("technology", "startup", name, "bangalore", 3.0, &[]);
            let est = calculate_compensation(&t, &req).unwrap();
            if !profile.equity_eligible {
                assert_eq!(est.equity, 0, "level {name} should have no equity");
            }
            if !profile.bonus_eligible {
                assert_eq!(est.bonus, 0, "level {name} should have no bonus");
            }
        }

        let intern = calculate_compensation(&t, &request("finance", "enterprise", "intern", "delhi", 0.0, &[])).unwrap();
        assert_eq!(intern.equity, 0);
        assert_eq!(intern.bonus, 0);
        assert_eq!(intern.total, intern.base);
    }

    #[test]
    fn test_unknown_categories_fall_back_to_defaults() {
        let t = tables();
        let unknown = request("alchemy", "guild", "archmage", "Atlantis", 5.0, &[]);
        let defaults = request("technology", "mid-size company", "mid", "bangalore", 5.0, &[]);

        let a = calculate_compensation(&t, &unknown).unwrap();
        let b = calculate_compensation(&t, &defaults).unwrap();

        assert_eq!(a.base, b.base);
        assert_eq!(a.equity, b.equity);
        assert_eq!(a.bonus, b.bonus);
        assert_eq!(a.multipliers.location, 1.0);
        assert_eq!(a.metadata.industry, "technology");
        assert_eq!(a.metadata.company_type, "mid-size company");
        assert_eq!(a.metadata.level, "mid");
        assert_eq!(
            a.metadata.fallbacks_applied,
            vec!["industry", "company_type", "level", "location"]
        );
    }

    #[test]
    fn test_experience_seven_uses_five_year_bracket() {
        let req = request("technology", "mid-size company", "mid", "bangalore", 7.0, &[]);
        let est = calculate_compensation(&tables(), &req).unwrap();
        assert_eq!(est.multipliers.experience, 1.5);
    }

    #[test]
    fn test_missing_base_salary_uses_default() {
        let mut req = request("technology", "startup", "mid", "bangalore", 5.0, &["System Design"]);
        req.base_salary = None;
        let est = calculate_compensation(&tables(), &req).unwrap();
        assert_eq!(est.base.median, 255_150);
    }

    #[test]
    fn test_negative_base_salary_propagates() {
        let mut req = request("technology", "mid-size company", "entry", "bangalore", 0.0, &[]);
        req.base_salary = Some(-50_000.0);
        let est = calculate_compensation(&tables(), &req).unwrap();
        // -50000 × 1.2 × 1.0 × 1.0 × 1.0 × 1.0
        assert_eq!(est.base.median, -60_000);
        assert!(est.total.median < 0);
    }

    #[test]
    fn test_non_finite_base_salary_rejected() {
        let mut req = request("technology", "startup", "mid", "bangalore", 5.0, &[]);
        req.base_salary = Some(f64::NAN);
        let err = calculate_compensation(&tables(), &req).unwrap_err();
        assert!(matches!(err, CompensationError::InvalidInput(_)));

        req.base_salary = Some(f64::INFINITY);
        assert!(calculate_compensation(&tables(), &req).is_err());
    }

    #[test]
    fn test_oversized_base_salary_rejected() {
        let mut req = request("technology", "startup", "mid", "bangalore", 5.0, &[]);
        req.base_salary = Some(1e300);
        let err = calculate_compensation(&tables(), &req).unwrap_err();
        assert!(matches!(err, CompensationError::InvalidInput(_)));

        req.base_salary = Some(-1e300);
        assert!(calculate_compensation(&tables(), &req).is_err());
    }

    #[test]
    fn test_large_base_salary_keeps_total_identity() {
        let mut req = request("technology", "startup", "mid", "bangalore", 5.0, &["Rust"]);
        req.base_salary = Some(1e12);
        let est = calculate_compensation(&tables(), &req).unwrap();
        assert_eq!(est.total.median, est.base.median + est.equity + est.bonus);
        assert_eq!(est.total.max, est.base.max + est.equity + est.bonus);
        assert!(est.total.max < i64::MAX);
    }

    #[test]
    fn test_metadata_carries_display_fields() {
        let req = request("Finance", "Fortune 500", "Director", "Mumbai", 12.0, &[]);
        let est = calculate_compensation(&tables(), &req).unwrap();
        assert_eq!(est.metadata.role, "Software Engineer");
        assert_eq!(est.metadata.industry, "finance");
        assert_eq!(est.metadata.growth_rate, 8.0);
        assert_eq!(est.metadata.benefits_score, 5);
        assert!(est.metadata.management_track);
    }
}
