//! JSON reporter
//!
//! Outputs `{filename, metrics, issues, status, insights?}` as pretty JSON.
//! The document parses back into a [`ProfileReport`], which is how saved
//! profiles feed a later insight pass.

use crate::reporters::ProfileReport;
use anyhow::Result;

/// Render report as JSON
pub fn render(report: &ProfileReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InsightResult;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_json_render_valid() {
        let report = test_report();
        let json_str = render(&report).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["filename"], "cities.csv");
        assert_eq!(parsed["status"], "complete");
        assert_eq!(parsed["metrics"]["total_rows"], 4);
        assert_eq!(parsed["issues"][0]["type"], "missing_data");
        assert!(parsed.get("insights").is_none());
    }

    #[test]
    fn test_json_parses_back_into_report() {
        let report = test_report()
            .with_score_breakdown()
            .with_insights(InsightResult::failure("no key"));
        let json_str = render(&report).expect("render JSON");
        let back: ProfileReport = serde_json::from_str(&json_str).expect("parse report");
        assert_eq!(back, report);
    }
}
