//! Tabular chart data: one category axis plus numeric series
//!
//! The first column is the category/index axis, every later column is a
//! numeric series candidate. Rows keep their raw values; conversion to
//! numbers happens on demand through [`parse_numeric`] so that garbled cells
//! only drop out of the computation that asked for them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::numeric::parse_numeric;
use crate::reader::{IoError, IoResult};

/// A single row: column name to raw cell value
pub type Row = Map<String, Value>;

/// Descriptor for a column of chart data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawColumn")]
pub struct ColumnSpec {
    /// Column name (unique within a table)
    pub name: String,

    /// Optional semantic role ("x", "y", "series", ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl ColumnSpec {
    /// Create a column descriptor without a role
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: None,
        }
    }

    /// Set the role
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

/// Chart documents list columns either as bare names or as objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawColumn {
    Name(String),
    Spec {
        name: String,
        #[serde(default)]
        role: Option<String>,
    },
}

impl From<RawColumn> for ColumnSpec {
    fn from(raw: RawColumn) -> Self {
        match raw {
            RawColumn::Name(name) => ColumnSpec::new(name),
            RawColumn::Spec { name, role } => ColumnSpec { name, role },
        }
    }
}

/// A parsed numeric observation of one series
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    /// Index of the source row
    pub row: usize,
    /// Raw category value of that row
    pub category: Value,
    /// Parsed numeric value
    pub value: f64,
}

/// In-memory chart table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabularData {
    /// Ordered columns; the first is the category axis
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,

    /// Ordered rows
    #[serde(rename = "data", alias = "rows", default)]
    pub rows: Vec<Row>,
}

impl TabularData {
    /// Create a table from columns and rows
    pub fn new(columns: Vec<ColumnSpec>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Build a table from column names and positional row values.
    ///
    /// Values beyond the number of columns are ignored, missing ones become null.
    pub fn from_records(names: &[&str], records: Vec<Vec<Value>>) -> Self {
        let columns: Vec<ColumnSpec> = names.iter().map(|n| ColumnSpec::new(*n)).collect();
        let rows = records
            .into_iter()
            .map(|record| {
                let mut values = record.into_iter();
                names
                    .iter()
                    .map(|name| (name.to_string(), values.next().unwrap_or(Value::Null)))
                    .collect::<Row>()
            })
            .collect();
        Self { columns, rows }
    }

    /// Check structural invariants (unique column names)
    pub fn validate(&self) -> IoResult<()> {
        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(IoError::InvalidTable(format!(
                    "duplicate column name: {}",
                    column.name
                )));
            }
        }
        Ok(())
    }

    /// True when there is a category axis, at least one series, and at least one row
    pub fn has_series_data(&self) -> bool {
        self.columns.len() >= 2 && !self.rows.is_empty()
    }

    /// The category/index column
    pub fn category_column(&self) -> Option<&ColumnSpec> {
        self.columns.first()
    }

    /// The numeric series columns (everything after the first column)
    pub fn series_columns(&self) -> &[ColumnSpec] {
        self.columns.get(1..).unwrap_or(&[])
    }

    /// Names of the numeric series columns
    pub fn series_names(&self) -> Vec<&str> {
        self.series_columns()
            .iter()
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Number of numeric series
    pub fn num_series(&self) -> usize {
        self.series_columns().len()
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Raw category value of a row (null when the row lacks one)
    pub fn category(&self, row: usize) -> Value {
        self.category_column()
            .and_then(|c| self.rows.get(row).and_then(|r| r.get(&c.name)))
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// Raw cell value
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// All convertible observations of a series, in row order
    pub fn series_points(&self, series: &str) -> Vec<SeriesPoint> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(i, row)| {
                let value = row.get(series).and_then(parse_numeric)?;
                Some(SeriesPoint {
                    row: i,
                    category: self.category(i),
                    value,
                })
            })
            .collect()
    }

    /// All convertible values of a series, in row order
    pub fn series_values(&self, series: &str) -> Vec<f64> {
        self.series_points(series).into_iter().map(|p| p.value).collect()
    }

    /// Convertible `(series, value)` pairs of one row, in column order
    pub fn row_values(&self, row: usize) -> Vec<(&str, f64)> {
        let Some(cells) = self.rows.get(row) else {
            return Vec::new();
        };
        self.series_columns()
            .iter()
            .filter_map(|c| {
                let value = cells.get(&c.name).and_then(parse_numeric)?;
                Some((c.name.as_str(), value))
            })
            .collect()
    }
}

/// Render a raw category value the way it appears in chart text.
///
/// Strings are used verbatim, numbers keep their JSON rendering, null is empty.
pub fn category_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
