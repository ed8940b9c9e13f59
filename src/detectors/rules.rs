//! The five built-in issue rules

use crate::detectors::base::Rule;
use crate::models::{format_measure, Issue, IssueKind, Metrics, Severity};

/// Overall missing percentage above which missing data is reported
const MISSING_DATA_THRESHOLD: f64 = 5.0;
/// Overall missing percentage above which missing data is critical
const MISSING_DATA_CRITICAL: f64 = 20.0;
/// Duplicate percentage above which duplicates are critical
const DUPLICATES_CRITICAL: f64 = 10.0;
/// Per-column missing percentage that marks a column as mostly empty
const HIGH_MISSING_COLUMN_THRESHOLD: f64 = 50.0;
/// How many offending columns the suggestion names
const MAX_NAMED_COLUMNS: usize = 3;
/// Row count below which a dataset is considered small
const SMALL_DATASET_ROWS: usize = 100;

pub struct MissingDataRule;

impl Rule for MissingDataRule {
    fn name(&self) -> &'static str {
        "MissingDataRule"
    }

    fn kind(&self) -> IssueKind {
        IssueKind::MissingData
    }

    fn evaluate(&self, metrics: &Metrics) -> Option<Issue> {
        let pct = metrics.missing_percentage?;
        if pct <= MISSING_DATA_THRESHOLD {
            return None;
        }

        let severity = if pct > MISSING_DATA_CRITICAL {
            Severity::Critical
        } else {
            Severity::Warning
        };

        Some(Issue::new(
            self.kind(),
            severity,
            format!("{}% of data is missing", format_measure(pct)),
            "Consider imputation strategies or removing columns with high missing rates",
        ))
    }
}

pub struct DuplicatesRule;

impl Rule for DuplicatesRule {
    fn name(&self) -> &'static str {
        "DuplicatesRule"
    }

    fn kind(&self) -> IssueKind {
        IssueKind::Duplicates
    }

    fn evaluate(&self, metrics: &Metrics) -> Option<Issue> {
        let dups = metrics.duplicate_rows.filter(|&d| d > 0)?;
        let pct = metrics.duplicate_percentage().unwrap_or(0.0);

        let severity = if pct > DUPLICATES_CRITICAL {
            Severity::Critical
        } else {
            Severity::Warning
        };

        Some(Issue::new(
            self.kind(),
            severity,
            format!("{} duplicate rows found ({:.1}%)", dups, pct),
            "Remove duplicate rows to avoid bias in model training",
        ))
    }
}

pub struct HighMissingColumnsRule;

impl Rule for HighMissingColumnsRule {
    fn name(&self) -> &'static str {
        "HighMissingColumnsRule"
    }

    fn kind(&self) -> IssueKind {
        IssueKind::HighMissingColumns
    }

    fn evaluate(&self, metrics: &Metrics) -> Option<Issue> {
        let offenders: Vec<&str> = metrics
            .missing_by_column
            .as_ref()?
            .iter()
            .filter(|(_, pct)| **pct > HIGH_MISSING_COLUMN_THRESHOLD)
            .map(|(name, _)| name.as_str())
            .collect();

        if offenders.is_empty() {
            return None;
        }

        let named = offenders
            .iter()
            .take(MAX_NAMED_COLUMNS)
            .copied()
            .collect::<Vec<_>>()
            .join(", ");

        Some(Issue::new(
            self.kind(),
            Severity::Warning,
            format!("{} columns have >50% missing data", offenders.len()),
            format!("Consider dropping columns: {}", named),
        ))
    }
}

pub struct SmallDatasetRule;

impl Rule for SmallDatasetRule {
    fn name(&self) -> &'static str {
        "SmallDatasetRule"
    }

    fn kind(&self) -> IssueKind {
        IssueKind::SmallDataset
    }

    fn evaluate(&self, metrics: &Metrics) -> Option<Issue> {
        if metrics.total_rows >= SMALL_DATASET_ROWS {
            return None;
        }

        Some(Issue::new(
            self.kind(),
            Severity::Info,
            format!("Only {} rows - small dataset", metrics.total_rows),
            "Collect more data for better model performance",
        ))
    }
}

pub struct NoNumericFeaturesRule;

impl Rule for NoNumericFeaturesRule {
    fn name(&self) -> &'static str {
        "NoNumericFeaturesRule"
    }

    fn kind(&self) -> IssueKind {
        IssueKind::NoNumericFeatures
    }

    fn evaluate(&self, metrics: &Metrics) -> Option<Issue> {
        let numeric = metrics.numeric_columns?;
        if numeric > 0 || metrics.total_columns == 0 {
            return None;
        }

        Some(Issue::new(
            self.kind(),
            Severity::Warning,
            "No numeric features detected",
            "Encode categorical variables or engineer numeric features",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn metrics() -> Metrics {
        Metrics {
            total_rows: 1000,
            total_columns: 3,
            missing_percentage: Some(0.0),
            duplicate_rows: Some(0),
            numeric_columns: Some(2),
            categorical_columns: Some(1),
            datetime_columns: Some(0),
            quality_score: 100.0,
            memory_estimate: Some(0),
            missing_by_column: Some(IndexMap::new()),
        }
    }

    #[test]
    fn test_missing_data_thresholds_are_strict() {
        let mut m = metrics();
        m.missing_percentage = Some(5.0);
        assert!(MissingDataRule.evaluate(&m).is_none());

        m.missing_percentage = Some(5.01);
        let issue = MissingDataRule.evaluate(&m).unwrap();
        assert_eq!(issue.severity, Severity::Warning);
        assert_eq!(issue.message, "5.01% of data is missing");

        m.missing_percentage = Some(20.0);
        assert_eq!(
            MissingDataRule.evaluate(&m).unwrap().severity,
            Severity::Warning
        );

        m.missing_percentage = Some(20.5);
        assert_eq!(
            MissingDataRule.evaluate(&m).unwrap().severity,
            Severity::Critical
        );
    }

    #[test]
    fn test_missing_message_keeps_decimal_point() {
        let mut m = metrics();
        m.missing_percentage = Some(25.0);
        let issue = MissingDataRule.evaluate(&m).unwrap();
        assert_eq!(issue.message, "25.0% of data is missing");
    }

    #[test]
    fn test_duplicates_severity() {
        let mut m = metrics();
        m.duplicate_rows = Some(100);
        let issue = DuplicatesRule.evaluate(&m).unwrap();
        assert_eq!(issue.severity, Severity::Warning);
        assert_eq!(issue.message, "100 duplicate rows found (10.0%)");

        m.duplicate_rows = Some(101);
        assert_eq!(
            DuplicatesRule.evaluate(&m).unwrap().severity,
            Severity::Critical
        );

        m.duplicate_rows = Some(0);
        assert!(DuplicatesRule.evaluate(&m).is_none());
    }

    #[test]
    fn test_high_missing_columns_names_first_three() {
        let mut m = metrics();
        let mut by_col = IndexMap::new();
        by_col.insert("a".to_string(), 75.0);
        by_col.insert("b".to_string(), 50.0);
        by_col.insert("c".to_string(), 51.0);
        by_col.insert("d".to_string(), 99.0);
        by_col.insert("e".to_string(), 100.0);
        m.missing_by_column = Some(by_col);

        let issue = HighMissingColumnsRule.evaluate(&m).unwrap();
        assert_eq!(issue.severity, Severity::Warning);
        assert_eq!(issue.message, "4 columns have >50% missing data");
        assert_eq!(issue.suggestion, "Consider dropping columns: a, c, d");
    }

    #[test]
    fn test_small_dataset_boundary() {
        let mut m = metrics();
        m.total_rows = 100;
        assert!(SmallDatasetRule.evaluate(&m).is_none());
        m.total_rows = 99;
        let issue = SmallDatasetRule.evaluate(&m).unwrap();
        assert_eq!(issue.severity, Severity::Info);
        assert_eq!(issue.message, "Only 99 rows - small dataset");
    }

    #[test]
    fn test_no_numeric_features() {
        let mut m = metrics();
        m.numeric_columns = Some(0);
        assert!(NoNumericFeaturesRule.evaluate(&m).is_some());
        m.total_columns = 0;
        assert!(NoNumericFeaturesRule.evaluate(&m).is_none());
    }

    #[test]
    fn test_rules_stay_silent_on_degraded_metrics() {
        let m = Metrics::degraded(500, 4);
        assert!(MissingDataRule.evaluate(&m).is_none());
        assert!(DuplicatesRule.evaluate(&m).is_none());
        assert!(HighMissingColumnsRule.evaluate(&m).is_none());
        assert!(SmallDatasetRule.evaluate(&m).is_none());
        assert!(NoNumericFeaturesRule.evaluate(&m).is_none());
    }
}
