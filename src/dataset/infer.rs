//! Missing-value policy and coarse column type inference

use super::{Cell, ColumnType};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Exact tokens (after trimming) that mean "no value".
///
/// An empty cell is always missing as well. Matching is case-sensitive.
pub const MISSING_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

pub fn is_missing_token(value: &str) -> bool {
    value.is_empty() || MISSING_TOKENS.contains(&value)
}

/// Infer the type bucket of a column from its cells.
///
/// Every present value must agree for a bucket to apply:
/// 1. Numeric (integers or floats)
/// 2. Boolean-like (`true`/`false`, any casing) -> `Other`
/// 3. Datetime (ISO dates, ISO datetimes, RFC 3339)
/// 4. Categorical (fallback)
///
/// A column without rows is categorical; a column whose rows are all
/// missing carries no evidence and is `Other`.
pub fn infer_column_type<'a>(
    row_count: usize,
    cells: impl Iterator<Item = &'a Cell>,
) -> ColumnType {
    if row_count == 0 {
        return ColumnType::Categorical;
    }

    let values: Vec<&str> = cells.filter_map(Cell::as_str).collect();
    if values.is_empty() {
        return ColumnType::Other;
    }

    if values.iter().all(|v| is_numeric(v)) {
        ColumnType::Numeric
    } else if values.iter().all(|v| is_boolean(v)) {
        ColumnType::Other
    } else if values.iter().all(|v| is_datetime(v)) {
        ColumnType::Datetime
    } else {
        ColumnType::Categorical
    }
}

fn is_numeric(value: &str) -> bool {
    value.parse::<i64>().is_ok() || value.parse::<f64>().is_ok()
}

fn is_boolean(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
}

fn is_datetime(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || DATETIME_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(value, fmt).is_ok())
        || DATE_FORMATS
            .iter()
            .any(|fmt| NaiveDate::parse_from_str(value, fmt).is_ok())
}
