//! Rule evaluation engine
//!
//! The IssueDetector owns the built-in rules in their fixed order and runs
//! each one against a metrics record. Rules are cheap threshold checks, so
//! they run sequentially and the output order equals the registration order.

use crate::detectors::base::Rule;
use crate::detectors::rules::{
    DuplicatesRule, HighMissingColumnsRule, MissingDataRule, NoNumericFeaturesRule,
    SmallDatasetRule,
};
use crate::models::{Issue, Metrics};
use tracing::debug;

/// Evaluates every registered rule against a metrics record
pub struct IssueDetector {
    rules: Vec<Box<dyn Rule>>,
}

impl IssueDetector {
    /// Create a detector with the built-in rules
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(MissingDataRule),
                Box::new(DuplicatesRule),
                Box::new(HighMissingColumnsRule),
                Box::new(SmallDatasetRule),
                Box::new(NoNumericFeaturesRule),
            ],
        }
    }

    /// Names of the registered rules, in evaluation order
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run all rules and collect the issues they raise, in rule order.
    pub fn detect(&self, metrics: &Metrics) -> Vec<Issue> {
        let issues: Vec<Issue> = self
            .rules
            .iter()
            .filter_map(|rule| {
                let issue = rule.evaluate(metrics);
                if let Some(ref issue) = issue {
                    debug!("{} raised {} ({})", rule.name(), issue.kind, issue.severity);
                }
                issue
            })
            .collect();

        debug!("Detected {} issues", issues.len());
        issues
    }
}

impl Default for IssueDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IssueKind, Severity};
    use indexmap::IndexMap;

    fn clean_metrics() -> Metrics {
        Metrics {
            total_rows: 1000,
            total_columns: 4,
            missing_percentage: Some(0.0),
            duplicate_rows: Some(0),
            numeric_columns: Some(3),
            categorical_columns: Some(1),
            datetime_columns: Some(0),
            quality_score: 100.0,
            memory_estimate: Some(32_000),
            missing_by_column: Some(IndexMap::new()),
        }
    }

    #[test]
    fn test_clean_dataset_has_no_issues() {
        assert!(IssueDetector::new().detect(&clean_metrics()).is_empty());
    }

    #[test]
    fn test_rule_order() {
        assert_eq!(
            IssueDetector::default().rule_names(),
            vec![
                "MissingDataRule",
                "DuplicatesRule",
                "HighMissingColumnsRule",
                "SmallDatasetRule",
                "NoNumericFeaturesRule",
            ]
        );
    }

    #[test]
    fn test_every_rule_fires_in_order() {
        let mut by_col = IndexMap::new();
        by_col.insert("notes".to_string(), 90.0);
        let metrics = Metrics {
            total_rows: 10,
            total_columns: 2,
            missing_percentage: Some(45.0),
            duplicate_rows: Some(3),
            numeric_columns: Some(0),
            categorical_columns: Some(2),
            datetime_columns: Some(0),
            quality_score: 0.0,
            memory_estimate: Some(1_000),
            missing_by_column: Some(by_col),
        };

        let issues = IssueDetector::new().detect(&metrics);
        let kinds: Vec<IssueKind> = issues.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                IssueKind::MissingData,
                IssueKind::Duplicates,
                IssueKind::HighMissingColumns,
                IssueKind::SmallDataset,
                IssueKind::NoNumericFeatures,
            ]
        );
        assert_eq!(issues[0].severity, Severity::Critical);
        assert_eq!(issues[1].severity, Severity::Critical);
        assert_eq!(issues[3].severity, Severity::Info);
    }

    #[test]
    fn test_detection_is_stable() {
        let mut metrics = clean_metrics();
        metrics.missing_percentage = Some(12.0);
        metrics.total_rows = 40;
        let detector = IssueDetector::new();
        assert_eq!(detector.detect(&metrics), detector.detect(&metrics));
    }

    #[test]
    fn test_degraded_small_dataset_still_flagged() {
        let issues = IssueDetector::new().detect(&Metrics::degraded(12, 3));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::SmallDataset);
    }
}
