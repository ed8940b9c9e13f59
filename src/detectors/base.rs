//! Base rule trait

use crate::models::{Issue, IssueKind, Metrics};

/// Trait for all issue rules
///
/// A rule is a total function over any `Metrics` value. Measures missing
/// from a degraded record mean "no evidence", and the rule stays silent.
///
/// # Example Implementation
///
/// ```ignore
/// pub struct WideDatasetRule;
///
/// impl Rule for WideDatasetRule {
///     fn name(&self) -> &'static str {
///         "WideDatasetRule"
///     }
///
///     fn kind(&self) -> IssueKind {
///         IssueKind::WideDataset
///     }
///
///     fn evaluate(&self, metrics: &Metrics) -> Option<Issue> {
///         (metrics.total_columns > metrics.total_rows).then(|| /* ... */)
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Unique identifier for this rule
    fn name(&self) -> &'static str;

    /// Kind of issue this rule raises
    fn kind(&self) -> IssueKind;

    /// Check the metrics and return an issue when the threshold is crossed
    fn evaluate(&self, metrics: &Metrics) -> Option<Issue>;
}
