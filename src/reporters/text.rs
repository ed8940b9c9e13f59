//! Text (terminal) reporter with colors and formatting

use crate::models::{IssueSummary, Severity};
use crate::reporters::ProfileReport;
use anyhow::Result;

/// Grade colors (ANSI escape codes)
fn grade_color(grade: &str) -> &'static str {
    match grade {
        "A" => "\x1b[32m", // Green
        "B" => "\x1b[92m", // Light green
        "C" => "\x1b[33m", // Yellow
        "D" => "\x1b[91m", // Light red
        "F" => "\x1b[31m", // Red
        _ => "\x1b[0m",
    }
}

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "\x1b[31m",
        Severity::Warning => "\x1b[33m",
        Severity::Info => "\x1b[90m",
    }
}

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Severity tag
fn severity_tag(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "[C]",
        Severity::Warning => "[W]",
        Severity::Info => "[I]",
    }
}

/// Render report as formatted terminal output
pub fn render(report: &ProfileReport) -> Result<String> {
    let m = report.metrics();
    let grade = report.grade();
    let mut out = String::new();

    // Header
    let grade_c = grade_color(grade);
    out.push_str(&format!(
        "\n{BOLD}Dataprobe Profile{RESET}  {}\n",
        report.profile.filename
    ));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Quality: {BOLD}{:.1}/100{RESET}  Grade: {grade_c}{BOLD}{}{RESET}  ",
        m.quality_score, grade
    ));
    out.push_str(&format!(
        "Rows: {}  Columns: {}\n",
        m.total_rows, m.total_columns
    ));

    if let Some(reason) = report.degraded_reason() {
        out.push_str(&format!(
            "\x1b[33mCould not inspect contents ({}); score is a fallback.{RESET}\n",
            reason
        ));
    }
    out.push('\n');

    // Composition and quality measures
    if m.is_complete() {
        out.push_str(&format!("{BOLD}METRICS{RESET}\n"));
        out.push_str(&format!(
            "  Numeric: {}  Categorical: {}  DateTime: {}\n",
            m.numeric_columns.unwrap_or(0),
            m.categorical_columns.unwrap_or(0),
            m.datetime_columns.unwrap_or(0)
        ));
        out.push_str(&format!(
            "  Missing: {}%  Duplicate rows: {}",
            m.missing_percentage.unwrap_or(0.0),
            m.duplicate_rows.unwrap_or(0)
        ));
        if let Some(bytes) = m.memory_estimate {
            out.push_str(&format!("  Memory: ~{}", format_bytes(bytes)));
        }
        out.push('\n');

        let top = m.top_missing_columns(5);
        if !top.is_empty() {
            out.push_str(&format!("  {DIM}Most missing:{RESET}"));
            for (name, pct) in top {
                out.push_str(&format!(" {}={}%", name, pct));
            }
            out.push('\n');
        }
        out.push('\n');
    }

    if let Some(b) = &report.score_breakdown {
        out.push_str(&format!("{BOLD}SCORE{RESET}\n"));
        out.push_str(&format!(
            "  100 - {:.1} (missing {:.2}% x2, max 40) - {:.1} (duplicates {:.2}% x3, max 30) = {:.1}\n\n",
            b.missing_deduction,
            b.missing_percentage,
            b.duplicate_deduction,
            b.duplicate_percentage,
            b.score
        ));
    }

    // Issues
    let summary = IssueSummary::from_issues(&report.profile.issues);
    out.push_str(&format!("{BOLD}ISSUES{RESET} ({} total)\n", summary.total));

    let mut summary_parts = Vec::new();
    if summary.critical > 0 {
        summary_parts.push(format!("\x1b[31m{} critical{RESET}", summary.critical));
    }
    if summary.warning > 0 {
        summary_parts.push(format!("\x1b[33m{} warning{RESET}", summary.warning));
    }
    if summary.info > 0 {
        summary_parts.push(format!("\x1b[90m{} info{RESET}", summary.info));
    }
    if !summary_parts.is_empty() {
        out.push_str(&format!("  {}\n", summary_parts.join(" | ")));
    }

    for issue in &report.profile.issues {
        let sev_c = severity_color(issue.severity);
        out.push_str(&format!(
            "  {sev_c}{}{RESET} {}\n      {DIM}{}{RESET}\n",
            severity_tag(issue.severity),
            issue.message,
            issue.suggestion
        ));
    }
    out.push('\n');

    // Insights
    if let Some(insights) = &report.insights {
        out.push_str(&format!("{BOLD}AI ASSESSMENT{RESET}\n"));
        out.push_str(&format!("  {}\n", insights.assessment));
        if let Some(message) = insights.message.as_deref().filter(|_| !insights.success) {
            out.push_str(&format!("  {DIM}{}{RESET}\n", message));
        }
        if !insights.recommendations.is_empty() {
            out.push_str(&format!("\n{BOLD}RECOMMENDATIONS{RESET}\n"));
            for (i, rec) in insights.recommendations.iter().enumerate() {
                out.push_str(&format!("  {}. {}\n", i + 1, rec));
            }
        }
        out.push('\n');
    }

    // Tips based on grade
    match grade {
        "A" => out.push_str(&format!("{DIM}Ready for training.{RESET}\n")),
        "B" => out.push_str(&format!(
            "{DIM}Good shape. Address remaining issues for an A.{RESET}\n"
        )),
        _ if report.insights.is_none() => out.push_str(&format!(
            "{DIM}Run with --insights for an AI assessment.{RESET}\n"
        )),
        _ => {}
    }

    Ok(out)
}

fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let b = bytes as f64;
    if b >= KIB * KIB {
        format!("{:.1} MiB", b / (KIB * KIB))
    } else if b >= KIB {
        format!("{:.1} KiB", b / KIB)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InsightResult;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_text_render_lists_issues() {
        let out = render(&test_report()).unwrap();
        assert!(out.contains("cities.csv"));
        assert!(out.contains("Rows: 4  Columns: 3"));
        assert!(out.contains("[C]"));
        assert!(out.contains("Only 4 rows - small dataset"));
        assert!(out.contains("--insights"));
    }

    #[test]
    fn test_text_render_insights_and_breakdown() {
        let mut insights = InsightResult::failure("unused");
        insights.success = true;
        insights.message = None;
        insights.assessment = "Needs cleanup.".into();
        insights.recommendations = vec!["Drop notes".into()];

        let out = render(&test_report().with_score_breakdown().with_insights(insights)).unwrap();
        assert!(out.contains("Needs cleanup."));
        assert!(out.contains("1. Drop notes"));
        assert!(out.contains("SCORE"));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KiB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MiB");
    }
}
