//! Parsing of generated insight text
//!
//! The generator is asked for two labeled sections but nothing guarantees it
//! complies. [`parse_insights`] therefore never fails: missing structure
//! resolves to fixed fallbacks.

use serde::{Deserialize, Serialize};

const ASSESSMENT_MARKER: &str = "ASSESSMENT:";
const RECOMMENDATIONS_MARKER: &str = "RECOMMENDATIONS:";

/// Recommendations kept from a response
pub const MAX_RECOMMENDATIONS: usize = 5;
/// Assessment length cap when the response has no usable structure
pub const ASSESSMENT_FALLBACK_CHARS: usize = 500;
/// Used when a response yields no recommendation lines
pub const FALLBACK_RECOMMENDATIONS: [&str; 3] = [
    "Review the full profiling report for detailed insights",
    "Address missing data through imputation or removal",
    "Remove duplicate rows to avoid training bias",
];

/// Assessment and recommendations extracted from a generator response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedInsights {
    pub assessment: String,
    pub recommendations: Vec<String>,
}

/// Split a generator response into assessment and recommendations.
///
/// - Text before the first `RECOMMENDATIONS:` is the assessment, minus a
///   leading `ASSESSMENT:` label. Any preamble keeps the text as it is.
/// - Lines after the marker count as recommendations when they start with a
///   digit or a dash; enumeration characters are stripped and at most
///   [`MAX_RECOMMENDATIONS`] are kept.
/// - Without the marker the assessment is capped at
///   [`ASSESSMENT_FALLBACK_CHARS`]; an empty assessment falls back to the
///   start of the raw text, and an empty recommendation list to
///   [`FALLBACK_RECOMMENDATIONS`].
pub fn parse_insights(raw: &str) -> ParsedInsights {
    let (head, tail) = match raw.split_once(RECOMMENDATIONS_MARKER) {
        Some((head, tail)) => (head, Some(tail)),
        None => (raw, None),
    };

    let body = head
        .trim_start()
        .strip_prefix(ASSESSMENT_MARKER)
        .unwrap_or(head);

    let mut assessment = body.trim().to_string();
    if tail.is_none() {
        assessment = truncate_chars(&assessment, ASSESSMENT_FALLBACK_CHARS);
    }
    if assessment.is_empty() {
        assessment = truncate_chars(raw, ASSESSMENT_FALLBACK_CHARS);
    }

    let mut recommendations: Vec<String> = tail
        .map(|text| {
            text.lines()
                .filter_map(recommendation_line)
                .take(MAX_RECOMMENDATIONS)
                .collect()
        })
        .unwrap_or_default();

    if recommendations.is_empty() {
        recommendations = FALLBACK_RECOMMENDATIONS
            .iter()
            .map(|r| r.to_string())
            .collect();
    }

    ParsedInsights {
        assessment,
        recommendations,
    }
}

fn recommendation_line(line: &str) -> Option<String> {
    let line = line.trim();
    let first = line.chars().next()?;
    if !(first.is_ascii_digit() || first == '-') {
        return None;
    }

    let cleaned = line
        .trim_start_matches(|c: char| c.is_ascii_digit() || matches!(c, '.' | '-' | ')' | ' '))
        .trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
