//! Dataset Quality Scoring
//!
//! Folds missingness and duplication into a single 0-100 heuristic.
//!
//! # Scoring Formula
//!
//! ```text
//! Score = clamp(100 - missing_deduction - duplicate_deduction, 0, 100)
//!
//! Where:
//!   missing_deduction   = min(missing_pct × 2, 40)
//!   duplicate_pct       = duplicates / rows × 100   (0 when rows = 0)
//!   duplicate_deduction = min(duplicate_pct × 3, 30)
//! ```
//!
//! Each dimension has its own cap, so a dataset that is entirely missing
//! and fully duplicated still floors at 30. Duplicates weigh 1.5× more per
//! percentage point than missing cells.
//!
//! # Example
//!
//! A 1,000 row dataset with 10% missing cells and 20 duplicate rows:
//! - missing deduction = 10 × 2 = 20
//! - duplicate deduction = 2% × 3 = 6
//!
//! Score = 100 - 20 - 6 = 74.0 (grade C)
//!
//! The weights and caps are fixed constants. There is no configuration
//! surface for them, so scores are reproducible across runs and machines.

mod quality_scorer;

pub use quality_scorer::{
    explain, grade_from_score, score, ScoreBreakdown, DUPLICATE_WEIGHT, MAX_DUPLICATE_DEDUCTION,
    MAX_MISSING_DEDUCTION, MISSING_WEIGHT,
};

pub(crate) use quality_scorer::round_to;
