use crate::error::SplitError;
use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ===== CELL & ROW TYPES =====
// Rows come from the first sheet of an uploaded export, keyed by the header
// row. Nothing about their shape is enforced; lookups fall back to Empty.

/// A single scalar cell value as read from (or written to) a worksheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Bool(bool),
    Text(String),
    #[default]
    Empty,
}

impl CellValue {
    /// Text content, if this cell holds a string. Numbers are not stringified:
    /// a numeric `Warehouse` cell never equals `"CEVA QLD"`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Numeric reading with falsy values collapsing to 0.
    ///
    /// Numeric strings are parsed (surrounding whitespace ignored); anything
    /// that does not parse, NaN, `false` and Empty all read as 0.
    pub fn as_number(&self) -> f64 {
        let value = match self {
            CellValue::Number(n) => *n,
            CellValue::Bool(true) => 1.0,
            CellValue::Bool(false) | CellValue::Empty => 0.0,
            CellValue::Text(text) => text.trim().parse::<f64>().unwrap_or(0.0),
        };
        if value.is_nan() {
            0.0
        } else {
            value
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Number(f64::from(value))
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

/// Ordered mapping from column name to cell value.
///
/// Column order is insertion order and survives filtering, projection and
/// serialization, so the header row of every output sheet is stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, CellValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self { cells: Vec::new() }
    }

    /// Build a row from `(column, value)` pairs, later duplicates overwriting earlier ones.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<CellValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        pairs.into_iter().collect()
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Text value of `column`, `None` when absent or non-text.
    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(CellValue::as_text)
    }

    /// Set `column`, keeping its position if it already exists.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => *existing = value,
            None => self.cells.push((column, value)),
        }
    }

    pub fn contains(&self, column: &str) -> bool {
        self.cells.iter().any(|(name, _)| name == column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<CellValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, value) in &self.cells {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// All rows of one sheet, in source order.
pub type Table = Vec<Row>;

// ===== REPORT TYPES =====

/// The six report exports the splitter knows how to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportType {
    #[serde(rename = "Inventory Enquiry AU")]
    InventoryAu,
    #[serde(rename = "Inventory Enquiry NZ")]
    InventoryNz,
    #[serde(rename = "Purchase Item AU")]
    PurchaseAu,
    #[serde(rename = "Purchase Item NZ")]
    PurchaseNz,
    #[serde(rename = "Sales Item AU")]
    SalesAu,
    #[serde(rename = "Sales Item NZ")]
    SalesNz,
}

impl ReportType {
    /// Classification priority order.
    pub const ALL: [ReportType; 6] = [
        ReportType::InventoryAu,
        ReportType::InventoryNz,
        ReportType::PurchaseAu,
        ReportType::PurchaseNz,
        ReportType::SalesAu,
        ReportType::SalesNz,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReportType::InventoryAu => "Inventory Enquiry AU",
            ReportType::InventoryNz => "Inventory Enquiry NZ",
            ReportType::PurchaseAu => "Purchase Item AU",
            ReportType::PurchaseNz => "Purchase Item NZ",
            ReportType::SalesAu => "Sales Item AU",
            ReportType::SalesNz => "Sales Item NZ",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReportType {
    type Err = SplitError;

    /// Labels are matched exactly, the same strings upload clients send.
    fn from_str(label: &str) -> Result<Self, Self::Err> {
        ReportType::ALL
            .into_iter()
            .find(|report_type| report_type.label() == label)
            .ok_or_else(|| SplitError::UnsupportedReportType {
                label: label.to_string(),
            })
    }
}

/// Outcome of running a file name through the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Recognized(ReportType),
    Unrecognized,
}

impl Classification {
    pub fn report_type(&self) -> Option<ReportType> {
        match self {
            Classification::Recognized(report_type) => Some(*report_type),
            Classification::Unrecognized => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, Classification::Recognized(_))
    }
}

// ===== SEGMENT OUTPUT =====

/// Rows selected by one segment rule, already projected.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub name: String,
    pub rows: Table,
}

impl Segment {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn summary(&self) -> SegmentSummary {
        SegmentSummary {
            name: self.name.clone(),
            rows: self.rows.len(),
        }
    }
}

/// `{name, rows}` entry reported for each segment, in rule order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentSummary {
    pub name: String,
    pub rows: usize,
}

/// Result summary handed back to whoever uploaded the file.
/// Field names follow the upload API's camelCase response shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingSummary {
    pub filename: String,
    pub source_filename: String,
    pub report_type: ReportType,
    pub original_rows: usize,
    pub worksheets: Vec<SegmentSummary>,
    pub input_sha256: String,
    pub processed_at: DateTime<Utc>,
}

/// Serialized output workbook together with its summary.
#[derive(Debug, Clone)]
pub struct ProcessedReport {
    pub summary: ProcessingSummary,
    pub workbook: Vec<u8>,
}
