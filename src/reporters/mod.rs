//! Output reporters for profiling results
//!
//! Supports multiple output formats:
//! - `text` - Terminal output with colors
//! - `json` - Machine-readable JSON, readable back by `dataprobe insights`
//! - `markdown` - GitHub-flavored Markdown

mod json;
mod markdown;
mod text;

use crate::metrics::ExtractionStatus;
use crate::models::{InsightResult, Metrics};
use crate::pipeline::Profile;
use crate::scoring::{self, ScoreBreakdown};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, json, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Everything a rendered report shows: the profile plus optional extras
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileReport {
    #[serde(flatten)]
    pub profile: Profile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<InsightResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_breakdown: Option<ScoreBreakdown>,
}

impl ProfileReport {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            insights: None,
            score_breakdown: None,
        }
    }

    pub fn with_insights(mut self, insights: InsightResult) -> Self {
        self.insights = Some(insights);
        self
    }

    /// Attach the score breakdown. Degraded profiles have none to show.
    pub fn with_score_breakdown(mut self) -> Self {
        self.score_breakdown = breakdown_for(&self.profile.metrics);
        self
    }

    pub fn metrics(&self) -> &Metrics {
        &self.profile.metrics
    }

    pub fn grade(&self) -> &'static str {
        scoring::grade_from_score(self.profile.metrics.quality_score)
    }

    pub fn degraded_reason(&self) -> Option<&str> {
        match &self.profile.status {
            ExtractionStatus::Degraded { reason } => Some(reason),
            ExtractionStatus::Complete => None,
        }
    }
}

fn breakdown_for(metrics: &Metrics) -> Option<ScoreBreakdown> {
    let missing = metrics.missing_percentage?;
    let duplicates = metrics.duplicate_rows?;
    let mut breakdown = scoring::explain(missing, duplicates, metrics.total_rows);
    // The stored percentage is rounded; the recorded score is authoritative
    breakdown.score = metrics.quality_score;
    breakdown.grade = scoring::grade_from_score(metrics.quality_score).to_string();
    Some(breakdown)
}

/// Render a report using an OutputFormat enum
pub fn report_with_format(report: &ProfileReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(report),
        OutputFormat::Json => json::render(report),
        OutputFormat::Markdown => markdown::render(report),
    }
}

/// Get the recommended file extension for a format
pub fn file_extension(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Text => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    }
}

/// MIME type used when storing a rendered report
pub fn content_type(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Text => "text/plain",
        OutputFormat::Json => "application/json",
        OutputFormat::Markdown => "text/markdown",
    }
}
