//! Core data models for Dataprobe
//!
//! These records are the serialization contract with any persistence or
//! presentation layer: field names and types are stable.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Quality score assigned when a dataset could not be inspected at all.
///
/// Signals "unknown quality", sitting in the middle of the scale.
pub const DEGRADED_QUALITY_SCORE: f64 = 50.0;

/// Render a measure the way the JSON contract shows it (`25.0`, `5.01`)
pub fn format_measure(value: f64) -> String {
    format!("{:?}", value)
}

/// Severity levels for issues
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "critical" => Ok(Severity::Critical),
            other => Err(format!(
                "Unknown severity '{}'. Valid values: info, warning, critical",
                other
            )),
        }
    }
}

/// Kind of issue raised by the detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingData,
    Duplicates,
    HighMissingColumns,
    SmallDataset,
    NoNumericFeatures,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::MissingData => "missing_data",
            IssueKind::Duplicates => "duplicates",
            IssueKind::HighMissingColumns => "high_missing_columns",
            IssueKind::SmallDataset => "small_dataset",
            IssueKind::NoNumericFeatures => "no_numeric_features",
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discrete, severity-tagged finding about a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
    pub suggestion: String,
}

impl Issue {
    pub fn new(
        kind: IssueKind,
        severity: Severity,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }
}

/// Summary of issues by severity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSummary {
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
    pub total: usize,
}

impl IssueSummary {
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut summary = Self::default();
        for issue in issues {
            match issue.severity {
                Severity::Critical => summary.critical += 1,
                Severity::Warning => summary.warning += 1,
                Severity::Info => summary.info += 1,
            }
            summary.total += 1;
        }
        summary
    }
}

/// Structural and quality measurements of one dataset.
///
/// `total_rows`, `total_columns` and `quality_score` are always known. The
/// remaining measures exist only when the dataset could be fully inspected;
/// a degraded extraction leaves them as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub total_rows: usize,
    pub total_columns: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_rows: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_columns: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categorical_columns: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime_columns: Option<usize>,
    pub quality_score: f64,
    /// Approximate in-memory footprint in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_estimate: Option<u64>,
    /// Column name -> missing percentage, only for columns with missing > 0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_by_column: Option<IndexMap<String, f64>>,
}

impl Metrics {
    /// Fallback record for a dataset that could not be parsed or inspected.
    pub fn degraded(total_rows: usize, total_columns: usize) -> Self {
        Self {
            total_rows,
            total_columns,
            missing_percentage: None,
            duplicate_rows: None,
            numeric_columns: None,
            categorical_columns: None,
            datetime_columns: None,
            quality_score: DEGRADED_QUALITY_SCORE,
            memory_estimate: None,
            missing_by_column: None,
        }
    }

    /// Whether every measure was computed
    pub fn is_complete(&self) -> bool {
        self.missing_percentage.is_some()
            && self.duplicate_rows.is_some()
            && self.numeric_columns.is_some()
            && self.categorical_columns.is_some()
            && self.datetime_columns.is_some()
            && self.missing_by_column.is_some()
    }

    /// Duplicate rows as a percentage of all rows (0 when there are no rows)
    pub fn duplicate_percentage(&self) -> Option<f64> {
        self.duplicate_rows.map(|dups| {
            if self.total_rows > 0 {
                dups as f64 / self.total_rows as f64 * 100.0
            } else {
                0.0
            }
        })
    }

    /// Columns sorted by missing percentage, highest first. Ties keep column order.
    pub fn top_missing_columns(&self, limit: usize) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> = self
            .missing_by_column
            .iter()
            .flatten()
            .map(|(name, pct)| (name.as_str(), *pct))
            .collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        entries.truncate(limit);
        entries
    }
}

/// Narrative assessment produced by the insight pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightResult {
    pub success: bool,
    pub assessment: String,
    pub recommendations: Vec<String>,
    /// Untouched generator output, kept for audit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
    /// Failure description when `success` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl InsightResult {
    /// Placeholder assessment shown when generation fails
    pub const UNAVAILABLE_ASSESSMENT: &'static str =
        "Unable to generate AI assessment at this time.";

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            assessment: Self::UNAVAILABLE_ASSESSMENT.to_string(),
            recommendations: Vec::new(),
            raw_response: None,
            message: Some(message.into()),
        }
    }
}
