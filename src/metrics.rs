//! Metric extraction
//!
//! Turns a [`Dataset`] (or the raw bytes of one) into a [`Metrics`] record.
//! Parse failures never propagate: they produce a degraded record with
//! best-effort row/column counts and the fixed "unknown quality" score.

use crate::dataset::{Cell, ColumnType, Dataset};
use crate::models::Metrics;
use crate::scoring::{self, round_to};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Fixed per-dataset overhead of the row index, in bytes
const INDEX_OVERHEAD_BYTES: u64 = 128;
/// Bytes per value for fixed-width columns
const FIXED_WIDTH_BYTES: u64 = 8;
/// Bytes per value for boolean-like columns
const BOOLEAN_BYTES: u64 = 1;
/// Pointer plus string header per present text value
const TEXT_OVERHEAD_BYTES: u64 = 8 + 49;
/// Pointer plus boxed placeholder per missing text value
const MISSING_TEXT_BYTES: u64 = 8 + 24;

/// Result of one extraction: either every measure, or the documented fallback
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    Complete(Metrics),
    Degraded { metrics: Metrics, reason: String },
}

impl ExtractionOutcome {
    pub fn metrics(&self) -> &Metrics {
        match self {
            ExtractionOutcome::Complete(metrics) => metrics,
            ExtractionOutcome::Degraded { metrics, .. } => metrics,
        }
    }

    pub fn into_metrics(self) -> Metrics {
        match self {
            ExtractionOutcome::Complete(metrics) => metrics,
            ExtractionOutcome::Degraded { metrics, .. } => metrics,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ExtractionOutcome::Degraded { .. })
    }

    pub fn status(&self) -> ExtractionStatus {
        match self {
            ExtractionOutcome::Complete(_) => ExtractionStatus::Complete,
            ExtractionOutcome::Degraded { reason, .. } => ExtractionStatus::Degraded {
                reason: reason.clone(),
            },
        }
    }
}

/// Serializable form of the extraction outcome flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExtractionStatus {
    Complete,
    Degraded { reason: String },
}

impl ExtractionStatus {
    pub fn is_degraded(&self) -> bool {
        matches!(self, ExtractionStatus::Degraded { .. })
    }
}

/// Computes structural and quality metrics
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricExtractor;

impl MetricExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Parse raw bytes and extract metrics, falling back on parse failure.
    pub fn extract_bytes(&self, content: &[u8], filename: &str) -> ExtractionOutcome {
        match Dataset::from_csv_bytes(content, filename) {
            Ok(dataset) => ExtractionOutcome::Complete(self.extract(&dataset)),
            Err(e) => {
                let (rows, columns) = crate::dataset::lenient_shape(content, filename);
                warn!(
                    "Could not inspect {} ({}); reporting {} rows x {} columns with fallback score",
                    filename, e, rows, columns
                );
                ExtractionOutcome::Degraded {
                    metrics: Metrics::degraded(rows, columns),
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Extract every measure from a parsed dataset, quality score included.
    pub fn extract(&self, dataset: &Dataset) -> Metrics {
        let total_rows = dataset.row_count();
        let total_columns = dataset.column_count();
        let total_cells = total_rows * total_columns;

        let mut missing_cells = 0usize;
        let mut missing_by_column = IndexMap::new();
        let mut numeric_columns = 0;
        let mut categorical_columns = 0;
        let mut datetime_columns = 0;
        let mut memory_estimate = INDEX_OVERHEAD_BYTES;

        for (idx, column) in dataset.columns().iter().enumerate() {
            let missing = dataset.column_cells(idx).filter(|c| c.is_missing()).count();
            missing_cells += missing;

            if missing > 0 && total_rows > 0 {
                let pct = missing as f64 / total_rows as f64 * 100.0;
                missing_by_column.insert(column.name.clone(), round_to(pct, 2));
            }

            match column.column_type {
                ColumnType::Numeric => numeric_columns += 1,
                ColumnType::Categorical => categorical_columns += 1,
                ColumnType::Datetime => datetime_columns += 1,
                ColumnType::Other => {}
            }

            memory_estimate += column_memory(dataset, idx, column.column_type);
        }

        let missing_percentage = if total_cells > 0 {
            (missing_cells as f64 / total_cells as f64 * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        let duplicate_rows = count_duplicate_rows(dataset.rows());
        let quality_score = scoring::score(missing_percentage, duplicate_rows, total_rows);

        debug!(
            "Extracted metrics: {} rows, {} cols, {:.2}% missing, {} duplicates, score {:.1}",
            total_rows, total_columns, missing_percentage, duplicate_rows, quality_score
        );

        Metrics {
            total_rows,
            total_columns,
            missing_percentage: Some(round_to(missing_percentage, 2)),
            duplicate_rows: Some(duplicate_rows),
            numeric_columns: Some(numeric_columns),
            categorical_columns: Some(categorical_columns),
            datetime_columns: Some(datetime_columns),
            quality_score,
            memory_estimate: Some(memory_estimate),
            missing_by_column: Some(missing_by_column),
        }
    }
}

/// Rows exactly equal (all columns) to some earlier row
pub fn count_duplicate_rows(rows: &[Vec<Cell>]) -> usize {
    let mut seen: FxHashSet<&[Cell]> = FxHashSet::default();
    rows.iter()
        .filter(|row| !seen.insert(row.as_slice()))
        .count()
}

fn column_memory(dataset: &Dataset, idx: usize, column_type: ColumnType) -> u64 {
    let rows = dataset.row_count() as u64;
    match column_type {
        ColumnType::Numeric | ColumnType::Datetime => rows * FIXED_WIDTH_BYTES,
        ColumnType::Other if is_boolean_like(dataset, idx) => rows * BOOLEAN_BYTES,
        ColumnType::Categorical | ColumnType::Other => dataset
            .column_cells(idx)
            .map(|cell| match cell {
                Cell::Missing => MISSING_TEXT_BYTES,
                Cell::Value(v) => TEXT_OVERHEAD_BYTES + v.len() as u64,
            })
            .sum(),
    }
}

fn is_boolean_like(dataset: &Dataset, idx: usize) -> bool {
    let mut present = dataset
        .column_cells(idx)
        .filter_map(Cell::as_str)
        .peekable();
    present.peek().is_some()
        && present.all(|v| v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("false"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(csv: &str) -> Metrics {
        MetricExtractor::new()
            .extract_bytes(csv.as_bytes(), "test.csv")
            .into_metrics()
    }

    #[test]
    fn test_clean_dataset() {
        let m = extract("a,b\n1,x\n2,y\n3,z\n");
        assert_eq!(m.total_rows, 3);
        assert_eq!(m.total_columns, 2);
        assert_eq!(m.missing_percentage, Some(0.0));
        assert_eq!(m.duplicate_rows, Some(0));
        assert_eq!(m.numeric_columns, Some(1));
        assert_eq!(m.categorical_columns, Some(1));
        assert_eq!(m.datetime_columns, Some(0));
        assert_eq!(m.quality_score, 100.0);
        assert!(m.missing_by_column.as_ref().unwrap().is_empty());
        assert!(m.is_complete());
    }

    #[test]
    fn test_missing_percentage_and_by_column() {
        // 8 cells, 2 missing, both in column b
        let m = extract("a,b\n1,\n2,NA\n3,x\n4,y\n");
        assert_eq!(m.missing_percentage, Some(25.0));
        let by_col = m.missing_by_column.unwrap();
        assert_eq!(by_col.len(), 1);
        assert_eq!(by_col.get("b"), Some(&50.0));
        assert_eq!(m.quality_score, 60.0);
    }

    #[test]
    fn test_missing_by_column_rounds_to_two_decimals() {
        let m = extract("a,b\n1,\n2,x\n3,y\n");
        assert_eq!(m.missing_by_column.unwrap().get("b"), Some(&33.33));
        assert_eq!(m.missing_percentage, Some(16.67));
    }

    #[test]
    fn test_duplicates_count_later_copies_only() {
        let m = extract("a,b\n1,x\n1,x\n1,x\n2,y\n");
        assert_eq!(m.duplicate_rows, Some(2));
        // 50% duplicates -> deduction capped at 30
        assert_eq!(m.quality_score, 70.0);
    }

    #[test]
    fn test_missing_cells_compare_equal_for_duplicates() {
        let m = extract("a,b\n1,\n1,NA\n");
        assert_eq!(m.duplicate_rows, Some(1));
    }

    #[test]
    fn test_type_buckets_exclude_other() {
        let m = extract("n,c,d,flag,empty\n1,x,2024-01-01,true,\n2,y,2024-01-02,false,\n");
        assert_eq!(m.total_columns, 5);
        assert_eq!(m.numeric_columns, Some(1));
        assert_eq!(m.categorical_columns, Some(1));
        assert_eq!(m.datetime_columns, Some(1));
    }

    #[test]
    fn test_zero_rows_has_zero_missing() {
        let m = extract("a,b,c\n");
        assert_eq!(m.total_rows, 0);
        assert_eq!(m.missing_percentage, Some(0.0));
        assert_eq!(m.duplicate_rows, Some(0));
        assert_eq!(m.quality_score, 100.0);
    }

    #[test]
    fn test_zero_columns_has_zero_missing() {
        let dataset = Dataset::from_rows(vec![], vec![vec![], vec![]]);
        let m = MetricExtractor::new().extract(&dataset);
        assert_eq!(m.total_rows, 2);
        assert_eq!(m.total_columns, 0);
        assert_eq!(m.missing_percentage, Some(0.0));
        assert!(m.quality_score >= 0.0 && m.quality_score <= 100.0);
    }

    #[test]
    fn test_unparseable_content_degrades() {
        let outcome = MetricExtractor::new().extract_bytes(&[0xff, 0x00, 0xfe], "bad.csv");
        assert!(outcome.is_degraded());
        assert!(outcome.status().is_degraded());
        let m = outcome.metrics();
        assert_eq!(m.quality_score, 50.0);
        assert!(m.missing_percentage.is_none());
    }

    #[test]
    fn test_empty_content_degrades_to_zero_shape() {
        let outcome = MetricExtractor::new().extract_bytes(b"", "empty.csv");
        assert!(outcome.is_degraded());
        assert_eq!(outcome.metrics().total_rows, 0);
        assert_eq!(outcome.metrics().total_columns, 0);
    }

    #[test]
    fn test_memory_estimate() {
        // index 128 + numeric 2*8 + text (57+1)+(57+2) + bool 2*1
        let m = extract("n,t,f\n1,a,true\n2,bb,false\n");
        assert_eq!(m.memory_estimate, Some(128 + 16 + 58 + 59 + 2));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let csv = "a,b,c\n1,x,\n1,x,\n2,,z\n";
        assert_eq!(extract(csv), extract(csv));
    }

    #[test]
    fn test_count_duplicate_rows_empty() {
        assert_eq!(count_duplicate_rows(&[]), 0);
    }
}
