//! Profiling and insight passes
//!
//! ```text
//! bytes ─▶ MetricExtractor ─▶ Metrics (score included) ─▶ IssueDetector ─▶ Profile
//!
//! Profile ─▶ InsightPromptBuilder ─▶ TextGenerator ─▶ parse_insights ─▶ InsightResult
//! ```
//!
//! The two passes share nothing but the `Metrics`/`Issue` values, so the
//! insight pass can be re-run later from a saved profile.

use crate::ai::{parse_insights, InsightPromptBuilder, TextGenerator};
use crate::detectors::IssueDetector;
use crate::metrics::{ExtractionStatus, MetricExtractor};
use crate::models::{InsightResult, Issue, Metrics};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Result of one profiling pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub filename: String,
    pub metrics: Metrics,
    pub issues: Vec<Issue>,
    #[serde(flatten)]
    pub status: ExtractionStatus,
}

impl Profile {
    pub fn is_degraded(&self) -> bool {
        self.status.is_degraded()
    }
}

/// Stateless driver for both passes
#[derive(Default)]
pub struct ProfilingPipeline {
    extractor: MetricExtractor,
    detector: IssueDetector,
}

impl ProfilingPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Profiling pass: dataset bytes to metrics and issues.
    ///
    /// Deterministic. Unreadable input yields a degraded profile rather
    /// than an error.
    pub fn profile(&self, content: &[u8], filename: &str) -> Profile {
        let outcome = self.extractor.extract_bytes(content, filename);
        let status = outcome.status();
        let metrics = outcome.into_metrics();
        let issues = self.detector.detect(&metrics);

        info!(
            "Profiled {}: {} rows x {} columns, score {:.1}, {} issues",
            filename,
            metrics.total_rows,
            metrics.total_columns,
            metrics.quality_score,
            issues.len()
        );

        Profile {
            filename: filename.to_string(),
            metrics,
            issues,
            status,
        }
    }

    /// Insight pass over previously computed metrics and issues.
    ///
    /// Generator failures and blank responses are reported through
    /// `InsightResult::success`, never as an error.
    pub fn generate_insights(
        &self,
        filename: &str,
        metrics: &Metrics,
        issues: &[Issue],
        generator: &dyn TextGenerator,
    ) -> InsightResult {
        let prompt = InsightPromptBuilder::new(filename, metrics, issues).build();

        let raw = match generator.generate(&prompt) {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!(
                    "Insight generation for {} returned an empty response",
                    filename
                );
                return InsightResult::failure("AI insights generation failed: empty response");
            }
            Err(e) => {
                warn!("Insight generation for {} failed: {}", filename, e);
                return InsightResult::failure(format!("AI insights generation failed: {}", e));
            }
        };

        let parsed = parse_insights(&raw);
        InsightResult {
            success: true,
            assessment: parsed.assessment,
            recommendations: parsed.recommendations,
            raw_response: Some(raw),
            message: None,
        }
    }
}
