//! Markdown reporter for GitHub-flavored Markdown output
//!
//! Suited to dataset READMEs, pull request comments and data cards.

use crate::models::{Issue, IssueSummary, Severity};
use crate::reporters::ProfileReport;
use anyhow::Result;
use chrono::Local;

/// Render report as GitHub-flavored Markdown
pub fn render(report: &ProfileReport) -> Result<String> {
    let mut md = String::new();

    md.push_str(&render_header(report));
    md.push('\n');

    md.push_str(&render_summary(report));
    md.push('\n');

    if report.metrics().is_complete() {
        md.push_str(&render_metrics(report));
        md.push('\n');
    }

    if let Some(section) = render_score_breakdown(report) {
        md.push_str(&section);
        md.push('\n');
    }

    md.push_str(&render_issues(&report.profile.issues));
    md.push('\n');

    if let Some(section) = render_insights(report) {
        md.push_str(&section);
        md.push('\n');
    }

    md.push_str(&render_footer());

    Ok(md)
}

fn render_header(report: &ProfileReport) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");

    format!(
        r#"# Data Quality Report: {}

**Grade: {}** | **Quality Score: {:.1}/100**

Generated: {}
"#,
        escape_cell(&report.profile.filename),
        report.grade(),
        report.metrics().quality_score,
        timestamp
    )
}

fn render_summary(report: &ProfileReport) -> String {
    let m = report.metrics();
    let assessment = match report.grade() {
        "A" => "Excellent - ready for training",
        "B" => "Good - minor cleanup recommended",
        "C" => "Fair - several issues should be addressed",
        "D" => "Poor - significant preprocessing needed",
        _ => "Critical - data needs major work before use",
    };

    let mut md = format!(
        r#"## Summary

| Metric | Value |
|--------|-------|
| **Rows** | {} |
| **Columns** | {} |
| **Total Issues** | {} |
| **Assessment** | {} |
"#,
        m.total_rows,
        m.total_columns,
        report.profile.issues.len(),
        assessment
    );

    if let Some(reason) = report.degraded_reason() {
        md.push_str(&format!(
            "\n> **Note:** the contents could not be inspected ({}). The score is a fallback value.\n",
            escape_cell(reason)
        ));
    }
    md
}

fn render_metrics(report: &ProfileReport) -> String {
    let m = report.metrics();
    let mut md = format!(
        r#"## Metrics

| Metric | Value |
|--------|-------|
| Numeric columns | {} |
| Categorical columns | {} |
| DateTime columns | {} |
| Missing data | {}% |
| Duplicate rows | {} |
| Memory estimate | {} bytes |
"#,
        m.numeric_columns.unwrap_or(0),
        m.categorical_columns.unwrap_or(0),
        m.datetime_columns.unwrap_or(0),
        m.missing_percentage.unwrap_or(0.0),
        m.duplicate_rows.unwrap_or(0),
        m.memory_estimate.unwrap_or(0)
    );

    let top = m.top_missing_columns(10);
    if !top.is_empty() {
        md.push_str(
            "\n### Columns with missing data\n\n| Column | Missing |\n|--------|---------|\n",
        );
        for (name, pct) in top {
            md.push_str(&format!("| `{}` | {}% |\n", escape_cell(name), pct));
        }
    }
    md
}

fn render_score_breakdown(report: &ProfileReport) -> Option<String> {
    let b = report.score_breakdown.as_ref()?;
    Some(format!(
        r#"## Score Breakdown

| Component | Input | Deduction |
|-----------|-------|-----------|
| Missing data (x2, max 40) | {:.2}% | -{:.1} |
| Duplicates (x3, max 30) | {:.2}% | -{:.1} |
| **Score** | | **{:.1}** |
"#,
        b.missing_percentage,
        b.missing_deduction,
        b.duplicate_percentage,
        b.duplicate_deduction,
        b.score
    ))
}

fn render_issues(issues: &[Issue]) -> String {
    let mut md = String::from("## Issues\n\n");

    if issues.is_empty() {
        md.push_str("✅ No issues found.\n");
        return md;
    }

    let summary = IssueSummary::from_issues(issues);
    md.push_str(&format!(
        "🔴 {} critical | 🟡 {} warning | ℹ️ {} info\n\n",
        summary.critical, summary.warning, summary.info
    ));

    // Keep detector order; it is meaningful
    for issue in issues {
        md.push_str(&format!(
            "- {} **{}** ({}): {}\n  - _Suggestion:_ {}\n",
            severity_emoji(issue.severity),
            issue.severity.as_str().to_uppercase(),
            issue.kind,
            escape_cell(&issue.message),
            escape_cell(&issue.suggestion)
        ));
    }
    md
}

fn render_insights(report: &ProfileReport) -> Option<String> {
    let insights = report.insights.as_ref()?;
    let mut md = format!("## AI Assessment\n\n{}\n", insights.assessment.trim());

    if !insights.recommendations.is_empty() {
        md.push_str("\n### Recommendations\n\n");
        for (i, rec) in insights.recommendations.iter().enumerate() {
            md.push_str(&format!("{}. {}\n", i + 1, rec));
        }
    }
    Some(md)
}

fn render_footer() -> String {
    r#"---

*Generated by dataprobe*
"#
    .to_string()
}

fn severity_emoji(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "🔴",
        Severity::Warning => "🟡",
        Severity::Info => "ℹ️",
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
