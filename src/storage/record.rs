//! Metadata record for a profiled upload
//!
//! Metrics are flattened into a plain attribute map at this boundary so a
//! key-value backend can hold them. Numbers carry an explicit integer/float
//! tag and are converted back only when a [`Metrics`] value is rebuilt.

use crate::metrics::ExtractionStatus;
use crate::models::{Issue, Metrics};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A number as stored: integral or floating, never coerced implicitly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberKind {
    Integer(i64),
    Float(f64),
}

impl NumberKind {
    pub fn as_f64(&self) -> f64 {
        match *self {
            NumberKind::Integer(i) => i as f64,
            NumberKind::Float(f) => f,
        }
    }

    /// Integral view; floats qualify only when they have no fractional part
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            NumberKind::Integer(i) => Some(i),
            NumberKind::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(f as i64),
            NumberKind::Float(_) => None,
        }
    }
}

impl From<usize> for NumberKind {
    fn from(value: usize) -> Self {
        i64::try_from(value)
            .map(NumberKind::Integer)
            .unwrap_or(NumberKind::Float(value as f64))
    }
}

impl From<u64> for NumberKind {
    fn from(value: u64) -> Self {
        i64::try_from(value)
            .map(NumberKind::Integer)
            .unwrap_or(NumberKind::Float(value as f64))
    }
}

impl From<f64> for NumberKind {
    fn from(value: f64) -> Self {
        NumberKind::Float(value)
    }
}

/// One stored attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(NumberKind),
    Text(String),
    List(Vec<FieldValue>),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<NumberKind> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<usize> for FieldValue {
    fn from(value: usize) -> Self {
        FieldValue::Number(value.into())
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Number(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value.into())
    }
}

/// Provenance plus flattened metrics for one profiled dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub id: String,
    pub owner: String,
    pub filename: String,
    pub file_size: u64,
    pub storage_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_key: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub attributes: IndexMap<String, FieldValue>,
}

impl DatasetRecord {
    pub fn new(
        owner: impl Into<String>,
        filename: impl Into<String>,
        file_size: u64,
        storage_key: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner: owner.into(),
            filename: filename.into(),
            file_size,
            storage_key: storage_key.into(),
            report_key: None,
            uploaded_at: Utc::now(),
            profiled_at: None,
            attributes: IndexMap::new(),
        }
    }

    /// Flatten a profiling result into the attribute map
    pub fn set_profile(&mut self, metrics: &Metrics, issues: &[Issue], status: &ExtractionStatus) {
        let attrs = &mut self.attributes;
        attrs.clear();

        attrs.insert("total_rows".into(), metrics.total_rows.into());
        attrs.insert("total_columns".into(), metrics.total_columns.into());
        attrs.insert("quality_score".into(), metrics.quality_score.into());
        if let Some(v) = metrics.missing_percentage {
            attrs.insert("missing_percentage".into(), v.into());
        }
        if let Some(v) = metrics.duplicate_rows {
            attrs.insert("duplicate_rows".into(), v.into());
        }
        if let Some(v) = metrics.numeric_columns {
            attrs.insert("numeric_columns".into(), v.into());
        }
        if let Some(v) = metrics.categorical_columns {
            attrs.insert("categorical_columns".into(), v.into());
        }
        if let Some(v) = metrics.datetime_columns {
            attrs.insert("datetime_columns".into(), v.into());
        }
        if let Some(v) = metrics.memory_estimate {
            attrs.insert("memory_estimate".into(), v.into());
        }
        if let Some(by_col) = &metrics.missing_by_column {
            let pairs = by_col
                .iter()
                .map(|(name, pct)| {
                    FieldValue::List(vec![FieldValue::Text(name.clone()), (*pct).into()])
                })
                .collect();
            attrs.insert("missing_by_column".into(), FieldValue::List(pairs));
        }

        attrs.insert("issue_count".into(), issues.len().into());
        let status_text = match status {
            ExtractionStatus::Complete => "complete",
            ExtractionStatus::Degraded { .. } => "degraded",
        };
        attrs.insert("status".into(), FieldValue::Text(status_text.into()));

        self.profiled_at = Some(Utc::now());
    }

    /// Rebuild the metrics record from stored attributes.
    ///
    /// Returns `None` when the always-present measures are missing (the
    /// record was never profiled).
    pub fn metrics(&self) -> Option<Metrics> {
        let count = |key: &str| {
            self.attributes
                .get(key)
                .and_then(FieldValue::as_number)
                .and_then(|n| n.as_i64())
                .and_then(|n| usize::try_from(n).ok())
        };
        let float = |key: &str| {
            self.attributes
                .get(key)
                .and_then(FieldValue::as_number)
                .map(|n| n.as_f64())
        };

        let missing_by_column = self
            .attributes
            .get("missing_by_column")
            .and_then(FieldValue::as_list)
            .map(|pairs| {
                pairs
                    .iter()
                    .filter_map(|pair| match pair.as_list()? {
                        [name, pct] => {
                            Some((name.as_text()?.to_string(), pct.as_number()?.as_f64()))
                        }
                        _ => None,
                    })
                    .collect::<IndexMap<String, f64>>()
            });

        Some(Metrics {
            total_rows: count("total_rows")?,
            total_columns: count("total_columns")?,
            quality_score: float("quality_score")?,
            missing_percentage: float("missing_percentage"),
            duplicate_rows: count("duplicate_rows"),
            numeric_columns: count("numeric_columns"),
            categorical_columns: count("categorical_columns"),
            datetime_columns: count("datetime_columns"),
            memory_estimate: count("memory_estimate").map(|n| n as u64),
            missing_by_column,
        })
    }

    pub fn status(&self) -> Option<&str> {
        self.attributes.get("status").and_then(FieldValue::as_text)
    }

    pub fn issue_count(&self) -> Option<usize> {
        self.attributes
            .get("issue_count")
            .and_then(FieldValue::as_number)
            .and_then(|n| n.as_i64())
            .and_then(|n| usize::try_from(n).ok())
    }
}
