use crate::error::SplitError;
use crate::sources::RawSheet;
use crate::table_set::{Sheet, TableSet};
use crate::types::*;
use anyhow::Result;
use rust_xlsxwriter::{Workbook, Worksheet};
use tracing::debug;

/// Turns a Table-Set into a downloadable workbook.
pub trait TableSetWriter {
    /// Sheets are written in Table-Set order.
    fn write_workbook(&self, table_set: &TableSet) -> Result<Vec<u8>, SplitError> {
        self.write_over(&[], table_set)
    }

    /// Uploaded sheets first, in workbook order and copied cell for cell,
    /// then the Table-Set. An uploaded sheet whose name the Table-Set reuses
    /// is dropped, so the new sheet lands at the end rather than in its slot.
    fn write_over(&self, input_sheets: &[RawSheet], table_set: &TableSet) -> Result<Vec<u8>, SplitError>;

    fn name(&self) -> &str;
}

/// Uploaded sheets that survive next to `table_set`. Sheet names compare
/// case-insensitively, as they do in Excel.
pub fn surviving_input_sheets<'a>(
    input_sheets: &'a [RawSheet],
    table_set: &TableSet,
) -> impl Iterator<Item = &'a RawSheet> {
    let replaced: Vec<String> = table_set.sheet_names().iter().map(|n| n.to_lowercase()).collect();
    input_sheets
        .iter()
        .filter(move |sheet| !replaced.contains(&sheet.name.to_lowercase()))
}

/// `.xlsx` output through rust_xlsxwriter.
///
/// Each sheet gets a header row (its column union) followed by its rows.
/// Empty cells stay blank and a sheet without rows has no header either.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxTableSetWriter;

impl XlsxTableSetWriter {
    pub fn new() -> Self {
        Self
    }
}

impl TableSetWriter for XlsxTableSetWriter {
    fn write_over(&self, input_sheets: &[RawSheet], table_set: &TableSet) -> Result<Vec<u8>, SplitError> {
        let mut workbook = Workbook::new();

        for raw in surviving_input_sheets(input_sheets, table_set) {
            let worksheet = named_worksheet(&mut workbook, &raw.name)?;
            write_raw_sheet(worksheet, raw)?;
            debug!("💾 Copied input sheet '{}'", raw.name);
        }

        for (name, sheet) in table_set.iter() {
            let worksheet = named_worksheet(&mut workbook, name)?;
            write_sheet(worksheet, sheet)?;
            debug!("💾 Wrote sheet '{}' ({} rows)", name, sheet.row_count());
        }

        Ok(workbook.save_to_buffer()?)
    }

    fn name(&self) -> &str {
        "rust_xlsxwriter"
    }
}

fn named_worksheet<'a>(workbook: &'a mut Workbook, name: &str) -> Result<&'a mut Worksheet, SplitError> {
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(name)
        .map_err(|e| SplitError::InvalidSheetName {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
    Ok(worksheet)
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, value: &CellValue) -> Result<(), SplitError> {
    match value {
        CellValue::Text(text) => {
            worksheet.write_string(row, col, text.as_str())?;
        }
        CellValue::Number(number) => {
            worksheet.write_number(row, col, *number)?;
        }
        CellValue::Bool(flag) => {
            worksheet.write_boolean(row, col, *flag)?;
        }
        CellValue::Empty => {}
    }
    Ok(())
}

/// Cell for cell at the original positions, blanks left blank.
fn write_raw_sheet(worksheet: &mut Worksheet, raw: &RawSheet) -> Result<(), SplitError> {
    let (first_row, first_col) = raw.start;
    for (r, cells) in raw.cells.iter().enumerate() {
        let row_num = u32::try_from(r)
            .ok()
            .and_then(|r| first_row.checked_add(r))
            .ok_or_else(|| SplitError::WorkbookWrite(format!("row {r} out of range in '{}'", raw.name)))?;
        for (c, value) in cells.iter().enumerate() {
            let col = u32::try_from(c)
                .ok()
                .and_then(|c| first_col.checked_add(c))
                .and_then(|c| u16::try_from(c).ok())
                .ok_or_else(|| SplitError::WorkbookWrite(format!("column {c} out of range in '{}'", raw.name)))?;
            write_cell(worksheet, row_num, col, value)?;
        }
    }
    Ok(())
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &Sheet) -> Result<(), SplitError> {
    if sheet.is_empty() {
        return Ok(());
    }

    for (col, header) in sheet.columns.iter().enumerate() {
        worksheet.write_string(0, column_index(col)?, header.as_str())?;
    }

    for (index, row) in sheet.rows.iter().enumerate() {
        let row_num = u32::try_from(index + 1)
            .map_err(|_| SplitError::WorkbookWrite(format!("row {} out of range", index + 1)))?;
        for (col, column) in sheet.columns.iter().enumerate() {
            if let Some(value) = row.get(column) {
                write_cell(worksheet, row_num, column_index(col)?, value)?;
            }
        }
    }
    Ok(())
}

fn column_index(col: usize) -> Result<u16, SplitError> {
    u16::try_from(col).map_err(|_| SplitError::WorkbookWrite(format!("column {col} out of range")))
}

impl ProcessingSummary {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_to_json(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
