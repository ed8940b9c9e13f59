//! Insights command - re-run the AI pass on a saved profile

use super::emit;
use anyhow::{Context, Result};
use console::style;
use dataprobe::ai::{AiClient, LlmBackend};
use dataprobe::config::UserConfig;
use dataprobe::reporters::{self, OutputFormat, ProfileReport};
use dataprobe::{InsightResult, ProfilingPipeline};
use std::path::Path;
use tracing::warn;

pub(super) fn run(
    path: &Path,
    format: OutputFormat,
    output: Option<&Path>,
    backend: Option<LlmBackend>,
    config: &UserConfig,
) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let saved: ProfileReport = serde_json::from_str(&text).with_context(|| {
        format!(
            "{} is not a JSON profile (create one with `dataprobe profile <FILE> --format json`)",
            path.display()
        )
    })?;

    let pipeline = ProfilingPipeline::new();
    let result = insight_pass(&pipeline, &saved, backend, config);
    let report = saved.with_insights(result);

    let rendered = reporters::report_with_format(&report, format)?;
    emit(&rendered, format, output)
}

/// Run the insight pass with the configured backend.
///
/// A missing key or unreachable backend is reported in the result, never
/// as a command failure.
pub(super) fn insight_pass(
    pipeline: &ProfilingPipeline,
    report: &ProfileReport,
    backend: Option<LlmBackend>,
    config: &UserConfig,
) -> InsightResult {
    let profile = &report.profile;
    match AiClient::from_user_config(config, backend) {
        Ok(client) => {
            eprintln!(
                "{} Requesting insights from {} ({})",
                style("…").dim(),
                client.backend(),
                client.model()
            );
            pipeline.generate_insights(
                &profile.filename,
                &profile.metrics,
                &profile.issues,
                &client,
            )
        }
        Err(e) => {
            warn!("AI client unavailable: {}", e);
            eprintln!("{} {}", style("⚠").yellow(), e);
            InsightResult::failure(format!("AI insights generation failed: {}", e))
        }
    }
}
