//! Prompt templates for dataset insights
//!
//! The insight prompt follows a fixed recipe so that the same profile always
//! produces the same prompt text.

use crate::models::{format_measure, Issue, Metrics};
use std::fmt::Write as _;

/// How many missing-by-column entries the prompt lists
const TOP_MISSING_COLUMNS: usize = 5;
/// Upper bound on any user-controlled text interpolated into the prompt
const MAX_FIELD_CHARS: usize = 200;
/// Issue list placeholder for a clean profile
const NO_ISSUES: &str = "No major issues detected";

/// System prompts for the insight pass
pub struct PromptTemplate;

impl PromptTemplate {
    pub fn system_prompt() -> &'static str {
        "You are a data quality expert for machine learning. You review dataset \
         profiling reports and give short, concrete advice on preparing the data \
         for model training. Answer only in the requested format."
    }

    /// Output format the generator is asked to follow
    pub fn response_format() -> &'static str {
        "Provide a response in this exact format:

ASSESSMENT:
[2-3 sentences overall quality assessment for ML readiness]

RECOMMENDATIONS:
1. [First specific recommendation]
2. [Second specific recommendation]
3. [Third specific recommendation]
4. [Fourth recommendation if needed]
5. [Fifth recommendation if needed]

Keep recommendations concrete and actionable. Focus on preprocessing steps to improve ML model performance."
    }
}

/// Builder for insight prompts
pub struct InsightPromptBuilder<'a> {
    filename: &'a str,
    metrics: &'a Metrics,
    issues: &'a [Issue],
}

impl<'a> InsightPromptBuilder<'a> {
    pub fn new(filename: &'a str, metrics: &'a Metrics, issues: &'a [Issue]) -> Self {
        Self {
            filename,
            metrics,
            issues,
        }
    }

    pub fn build(&self) -> String {
        let m = self.metrics;
        let mut prompt = String::new();

        prompt.push_str(
            "You are a data quality expert for machine learning. Analyze this dataset \
             quality report and provide actionable insights.\n\n",
        );

        let _ = writeln!(prompt, "Dataset: {}", sanitize_text(self.filename));
        let _ = writeln!(prompt, "Total Rows: {}", m.total_rows);
        let _ = writeln!(prompt, "Total Columns: {}", m.total_columns);
        let _ = writeln!(
            prompt,
            "Quality Score: {}/100",
            format_measure(m.quality_score)
        );

        prompt.push_str("\nData Composition:\n");
        let _ = writeln!(prompt, "- Numeric columns: {}", or_na(m.numeric_columns));
        let _ = writeln!(
            prompt,
            "- Categorical columns: {}",
            or_na(m.categorical_columns)
        );
        let _ = writeln!(prompt, "- DateTime columns: {}", or_na(m.datetime_columns));

        prompt.push_str("\nData Quality Issues:\n");
        let _ = writeln!(
            prompt,
            "- Missing data: {}%",
            or_na(m.missing_percentage.map(format_measure))
        );
        let _ = writeln!(prompt, "- Duplicate rows: {}", or_na(m.duplicate_rows));

        let top_missing = m.top_missing_columns(TOP_MISSING_COLUMNS);
        if !top_missing.is_empty() {
            prompt.push_str("\nColumns with missing data:\n");
            for (column, pct) in top_missing {
                let _ = writeln!(
                    prompt,
                    "- {}: {}% missing",
                    sanitize_text(column),
                    format_measure(pct)
                );
            }
        }

        prompt.push_str("\nDetected Issues:\n");
        prompt.push_str(&self.issues_section());
        prompt.push_str("\n\n");
        prompt.push_str(PromptTemplate::response_format());

        prompt
    }

    fn issues_section(&self) -> String {
        if self.issues.is_empty() {
            return NO_ISSUES.to_string();
        }
        self.issues
            .iter()
            .map(|issue| {
                format!(
                    "- {}: {}",
                    issue.severity.as_str().to_uppercase(),
                    issue.message
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn or_na<T: std::fmt::Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Sanitize text to prevent prompt injection
///
/// Control characters (newlines included) collapse to spaces so a crafted
/// filename or column header cannot open a new prompt section.
fn sanitize_text(text: &str) -> String {
    use regex::Regex;
    use std::sync::OnceLock;

    static INJECTION_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

    fn get_injection_patterns() -> &'static Vec<Regex> {
        INJECTION_PATTERNS.get_or_init(|| {
            vec![
                Regex::new(r"(?i)ignore\s+(all\s+)?previous\s+instructions?").expect("valid regex"),
                Regex::new(r"(?i)disregard\s+(all\s+)?previous").expect("valid regex"),
                Regex::new(r"(?i)forget\s+(all\s+)?previous").expect("valid regex"),
                Regex::new(r"(?i)system\s*:\s*").expect("valid regex"),
                Regex::new(r"(?i)<\s*system\s*>").expect("valid regex"),
                Regex::new(r"(?i)assistant\s*:\s*").expect("valid regex"),
                Regex::new(r"(?i)human\s*:\s*").expect("valid regex"),
                Regex::new(r"(?i)(assessment|recommendations)\s*:").expect("valid regex"),
            ]
        })
    }

    let mut result: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    for pattern in get_injection_patterns().iter() {
        result = pattern.replace_all(&result, "[REDACTED]").to_string();
    }

    if result.chars().count() > MAX_FIELD_CHARS {
        result = result.chars().take(MAX_FIELD_CHARS).collect();
        result.push_str("... [truncated]");
    }

    result
}
