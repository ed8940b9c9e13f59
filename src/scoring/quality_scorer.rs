//! Weighted-deduction quality scorer

use serde::{Deserialize, Serialize};

/// Points deducted per percent of missing cells
pub const MISSING_WEIGHT: f64 = 2.0;
/// Cap on the missing-data deduction
pub const MAX_MISSING_DEDUCTION: f64 = 40.0;
/// Points deducted per percent of duplicate rows
pub const DUPLICATE_WEIGHT: f64 = 3.0;
/// Cap on the duplicate deduction
pub const MAX_DUPLICATE_DEDUCTION: f64 = 30.0;

/// Every intermediate value behind a score, for `--explain-score`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub missing_percentage: f64,
    pub missing_deduction: f64,
    pub duplicate_percentage: f64,
    pub duplicate_deduction: f64,
    pub score: f64,
    pub grade: String,
}

/// Score a dataset from its missing percentage and duplicate count.
///
/// Always returns a value in `[0, 100]` rounded to one decimal.
pub fn score(missing_pct: f64, duplicate_count: usize, total_rows: usize) -> f64 {
    explain(missing_pct, duplicate_count, total_rows).score
}

/// Score a dataset and keep the intermediate deductions.
pub fn explain(missing_pct: f64, duplicate_count: usize, total_rows: usize) -> ScoreBreakdown {
    // NaN and negative inputs carry no penalty
    let missing_deduction = if missing_pct > 0.0 {
        (missing_pct * MISSING_WEIGHT).min(MAX_MISSING_DEDUCTION)
    } else {
        0.0
    };

    let duplicate_percentage = if total_rows > 0 {
        duplicate_count as f64 / total_rows as f64 * 100.0
    } else {
        0.0
    };
    let duplicate_deduction = if duplicate_percentage > 0.0 {
        (duplicate_percentage * DUPLICATE_WEIGHT).min(MAX_DUPLICATE_DEDUCTION)
    } else {
        0.0
    };

    let raw = 100.0 - missing_deduction - duplicate_deduction;
    let score = round_to(raw, 1).clamp(0.0, 100.0);

    ScoreBreakdown {
        missing_percentage: missing_pct,
        missing_deduction,
        duplicate_percentage,
        duplicate_deduction,
        score,
        grade: grade_from_score(score).to_string(),
    }
}

/// Letter grade for presentation. Never feeds back into scoring.
pub fn grade_from_score(score: f64) -> &'static str {
    match score {
        s if s >= 90.0 => "A",
        s if s >= 80.0 => "B",
        s if s >= 70.0 => "C",
        s if s >= 60.0 => "D",
        _ => "F",
    }
}

/// Round half away from zero to a fixed number of decimals
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clean_dataset_scores_100() {
        assert_eq!(score(0.0, 0, 500), 100.0);
        assert_eq!(score(0.0, 0, 1), 100.0);
    }

    #[test]
    fn test_missing_deduction_is_capped() {
        assert_eq!(score(50.0, 0, 100), 60.0);
        assert_eq!(score(100.0, 0, 100), 60.0);
        assert_eq!(score(10.0, 0, 100), 80.0);
    }

    #[test]
    fn test_duplicate_deduction_is_capped() {
        assert_eq!(score(0.0, 100, 100), 70.0);
        assert_eq!(score(0.0, 5, 100), 85.0);
    }

    #[test]
    fn test_worst_case_floors_at_30() {
        assert_eq!(score(100.0, 1000, 1000), 30.0);
    }

    #[test]
    fn test_zero_rows_has_no_duplicate_penalty() {
        assert_eq!(score(0.0, 3, 0), 100.0);
    }

    #[test]
    fn test_rounds_to_one_decimal() {
        // 1/3 duplicates -> 33.33% -> capped at 30; 0.123% missing -> 0.246
        assert_eq!(score(0.123, 0, 10), 99.8);
        assert_eq!(score(1.0, 1, 3), 68.0);
    }

    #[test]
    fn test_nan_and_negative_inputs_do_not_penalize() {
        assert_eq!(score(f64::NAN, 0, 10), 100.0);
        assert_eq!(score(-5.0, 0, 10), 100.0);
        assert_eq!(score(f64::INFINITY, 0, 10), 60.0);
    }

    #[test]
    fn test_explain_matches_score() {
        let breakdown = explain(10.0, 20, 1000);
        assert_eq!(breakdown.missing_deduction, 20.0);
        assert!((breakdown.duplicate_percentage - 2.0).abs() < 1e-9);
        assert!((breakdown.duplicate_deduction - 6.0).abs() < 1e-9);
        assert_eq!(breakdown.score, 74.0);
        assert_eq!(breakdown.grade, "C");
        assert_eq!(breakdown.score, score(10.0, 20, 1000));
    }

    #[test]
    fn test_grades() {
        assert_eq!(grade_from_score(100.0), "A");
        assert_eq!(grade_from_score(90.0), "A");
        assert_eq!(grade_from_score(85.5), "B");
        assert_eq!(grade_from_score(70.0), "C");
        assert_eq!(grade_from_score(60.0), "D");
        assert_eq!(grade_from_score(30.0), "F");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(12.346, 2), 12.35);
        assert_eq!(round_to(99.75, 1), 99.8);
        assert_eq!(round_to(0.0, 2), 0.0);
    }

    proptest! {
        #[test]
        fn prop_score_is_bounded(
            missing in -50.0f64..250.0,
            rows in 0usize..10_000,
            dup_seed in 0usize..10_000,
        ) {
            let dups = if rows == 0 { 0 } else { dup_seed % (rows + 1) };
            let s = score(missing, dups, rows);
            prop_assert!((0.0..=100.0).contains(&s));
            prop_assert!(s >= 30.0);
        }

        #[test]
        fn prop_more_missing_never_scores_higher(
            a in 0.0f64..100.0,
            b in 0.0f64..100.0,
            rows in 1usize..1000,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(score(hi, 0, rows) <= score(lo, 0, rows));
        }
    }
}
