//! Issue detection
//!
//! A small rule engine over [`Metrics`](crate::models::Metrics). Each rule
//! checks one fixed threshold and yields at most one issue. The engine
//! evaluates rules in a fixed order, and that order is part of the output
//! contract (prompt construction and reports consume it as-is):
//!
//! 1. `missing_data` - overall missing > 5% (critical above 20%)
//! 2. `duplicates` - any duplicate rows (critical above 10% of rows)
//! 3. `high_missing_columns` - any column over 50% missing
//! 4. `small_dataset` - fewer than 100 rows
//! 5. `no_numeric_features` - no numeric column in a non-empty schema
//!
//! All comparisons are strict, so a value sitting exactly on a threshold
//! raises nothing.

mod base;
mod engine;
mod rules;

pub use base::Rule;
pub use engine::IssueDetector;
pub use rules::{
    DuplicatesRule, HighMissingColumnsRule, MissingDataRule, NoNumericFeaturesRule,
    SmallDatasetRule,
};
