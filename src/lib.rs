//! Dataprobe - data quality profiling for ML datasets
//!
//! Takes raw delimited tabular bytes, measures missingness, duplication and
//! column composition, folds those into a bounded 0-100 quality score, and
//! flags severity-ranked issues. An optional insight pass asks an external
//! text generator for a narrative assessment and parses it defensively.
//!
//! # Example
//!
//! ```
//! let profile = dataprobe::profile(b"a,b\n1,x\n1,x\n", "tiny.csv");
//! assert_eq!(profile.metrics.duplicate_rows, Some(1));
//! assert!(profile.metrics.quality_score <= 100.0);
//! ```

pub mod ai;
pub mod config;
pub mod dataset;
pub mod detectors;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod reporters;
pub mod scoring;
pub mod storage;

pub use ai::{parse_insights, ParsedInsights, TextGenerator};
pub use models::{InsightResult, Issue, IssueKind, Metrics, Severity};
pub use pipeline::{Profile, ProfilingPipeline};
pub use scoring::score;

/// Run one profiling pass over raw dataset bytes.
pub fn profile(content: &[u8], filename: &str) -> Profile {
    ProfilingPipeline::new().profile(content, filename)
}

/// Run one insight pass over previously computed metrics and issues.
pub fn generate_insights(
    filename: &str,
    metrics: &Metrics,
    issues: &[Issue],
    generator: &dyn TextGenerator,
) -> InsightResult {
    ProfilingPipeline::new().generate_insights(filename, metrics, issues, generator)
}
