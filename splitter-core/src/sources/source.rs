// Row source abstraction
//
// This module defines the boundary between workbook parsing (bytes -> rows)
// and the rule engine (rows -> segments). Everything after this point works
// with `Row`s and does not care which spreadsheet format they came from.
// The untouched cell grids travel alongside so the output can carry the
// uploaded sheets through as they were.

use crate::error::SplitError;
use crate::types::{CellValue, Table};
use std::path::Path;

/// Rows of the first worksheet of an uploaded workbook.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceSheet {
    /// Name of the worksheet the rows were read from
    pub name: String,
    pub rows: Table,
}

/// One uploaded worksheet, cell for cell.
///
/// `cells[r][c]` sits at `(start.0 + r, start.1 + c)` on the sheet. Blank
/// cells and blank rows inside the used range are kept as `Empty`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawSheet {
    pub name: String,
    /// Zero-based (row, column) of the top-left used cell
    pub start: (u32, u32),
    pub cells: Vec<Vec<CellValue>>,
}

impl RawSheet {
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|row| row.iter().all(CellValue::is_empty))
    }

    /// Cell at an absolute sheet position; `Empty` outside the used range.
    pub fn cell(&self, row: u32, col: u32) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        let (Some(r), Some(c)) = (row.checked_sub(self.start.0), col.checked_sub(self.start.1)) else {
            return &EMPTY;
        };
        self.cells
            .get(r as usize)
            .and_then(|cells| cells.get(c as usize))
            .unwrap_or(&EMPTY)
    }
}

/// Everything read from one upload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceWorkbook {
    /// Every worksheet in workbook order
    pub sheets: Vec<RawSheet>,
    /// Header-keyed rows of the first worksheet, for the rule engine
    pub first_sheet: SourceSheet,
}

/// Turns an uploaded workbook into rows.
///
/// Only the first worksheet feeds the rule engine. Its first row is the header
/// and supplies the column names for every following row.
pub trait RowSource {
    fn read_workbook(&self, bytes: &[u8]) -> Result<SourceWorkbook, SplitError>;

    fn read_first_sheet(&self, bytes: &[u8]) -> Result<SourceSheet, SplitError> {
        Ok(self.read_workbook(bytes)?.first_sheet)
    }

    /// Reads the file and hands the bytes to [`RowSource::read_first_sheet`].
    fn read_file(&self, path: &Path) -> Result<SourceSheet, SplitError> {
        let bytes = std::fs::read(path).map_err(|e| {
            SplitError::WorkbookRead(format!("{}: {}", path.display(), e))
        })?;
        self.read_first_sheet(&bytes)
    }

    /// Source name for logging
    fn name(&self) -> &str;
}
