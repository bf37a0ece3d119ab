// Output workbook model.
//
// A TableSet is an ordered list of named sheets. Sheet names are unique:
// putting a sheet under an existing name drops the old one and appends the
// new one at the end. Sheets are never merged.

use crate::types::{Row, Table};

/// One output worksheet: a header derived from its rows plus the rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    pub columns: Vec<String>,
    pub rows: Table,
}

impl Sheet {
    /// Header is the union of row keys in first-seen order.
    pub fn from_rows(rows: Table) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for column in row.columns() {
                if !columns.iter().any(|existing| existing == column) {
                    columns.push(column.to_string());
                }
            }
        }
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableSet {
    sheets: Vec<(String, Sheet)>,
}

impl TableSet {
    pub fn new() -> Self {
        Self { sheets: Vec::new() }
    }

    /// Builder form of [`TableSet::insert_sheet`].
    pub fn with_sheet(mut self, name: impl Into<String>, rows: Table) -> Self {
        self.insert_sheet(name, rows);
        self
    }

    /// Remove any sheet called `name`, then append the new one.
    pub fn insert_sheet(&mut self, name: impl Into<String>, rows: Table) {
        let name = name.into();
        self.sheets.retain(|(existing, _)| *existing != name);
        self.sheets.push((name, Sheet::from_rows(rows)));
    }

    pub fn get(&self, name: &str) -> Option<&Sheet> {
        self.sheets
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, sheet)| sheet)
    }

    /// Rows of sheet `name`, empty when the sheet does not exist.
    pub fn rows(&self, name: &str) -> &[Row] {
        self.get(name).map(|sheet| sheet.rows.as_slice()).unwrap_or(&[])
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Sheet)> {
        self.sheets.iter().map(|(name, sheet)| (name.as_str(), sheet))
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}
