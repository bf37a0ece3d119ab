use super::source::{RawSheet, RowSource, SourceSheet, SourceWorkbook};
use crate::error::SplitError;
use crate::types::{CellValue, Row, Table};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use std::io::Cursor;
use tracing::{debug, info, warn};

/// Header used for columns whose header cell is blank.
const EMPTY_HEADER: &str = "__EMPTY";

/// Reads `.xlsx` / `.xls` workbooks with calamine.
///
/// Every worksheet is kept as a raw grid. Rows for the rule engine come from
/// the first worksheet only:
/// - blank header cells become `__EMPTY`, `__EMPTY_1`, ...
/// - repeated headers get `_1`, `_2`, ... suffixes
/// - empty and error cells are left out of the row entirely
/// - rows with no remaining cell are skipped
/// - date cells become their serial number
#[derive(Debug, Clone, Copy, Default)]
pub struct CalamineRowSource;

impl CalamineRowSource {
    pub fn new() -> Self {
        Self
    }
}

impl RowSource for CalamineRowSource {
    fn read_workbook(&self, bytes: &[u8]) -> Result<SourceWorkbook, SplitError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(SplitError::EmptyWorkbook);
        }

        let mut sheets = Vec::with_capacity(sheet_names.len());
        let mut first_sheet = None;
        for name in sheet_names {
            let range = workbook.worksheet_range(&name)?;
            if first_sheet.is_none() {
                first_sheet = Some(extract_rows(&name, &range));
            }
            debug!("📑 Sheet '{}': {:?} cells", name, range.get_size());
            sheets.push(raw_sheet(name, &range));
        }

        Ok(SourceWorkbook {
            sheets,
            first_sheet: first_sheet.unwrap_or_default(),
        })
    }

    fn name(&self) -> &str {
        "calamine"
    }
}

fn raw_sheet(name: String, range: &Range<Data>) -> RawSheet {
    RawSheet {
        name,
        start: range.start().unwrap_or((0, 0)),
        cells: range
            .rows()
            .map(|row| row.iter().map(raw_cell_value).collect())
            .collect(),
    }
}

/// Header-keyed rows of one worksheet.
fn extract_rows(sheet_name: &str, range: &Range<Data>) -> SourceSheet {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        info!("📄 Sheet '{}' is empty", sheet_name);
        return SourceSheet {
            name: sheet_name.to_string(),
            rows: Vec::new(),
        };
    };

    let headers = header_names(header_row);
    debug!("📑 Headers: {:?}", headers);

    let mut table: Table = Vec::new();
    let mut skipped = 0usize;
    for data_row in rows {
        let row: Row = headers
            .iter()
            .zip(data_row.iter())
            .filter_map(|(header, cell)| {
                let value = cell_value(cell);
                (!value.is_empty()).then(|| (header.clone(), value))
            })
            .collect();

        if row.is_empty() {
            skipped += 1;
            continue;
        }
        table.push(row);
    }

    info!(
        "📊 Read {} rows from sheet '{}' ({} blank rows skipped)",
        table.len(),
        sheet_name,
        skipped
    );

    SourceSheet {
        name: sheet_name.to_string(),
        rows: table,
    }
}

/// Column names from the header row, with blanks filled and duplicates suffixed.
fn header_names(header_row: &[Data]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::with_capacity(header_row.len());
    for cell in header_row {
        let raw = match cell {
            Data::Empty => EMPTY_HEADER.to_string(),
            Data::String(text) if text.is_empty() => EMPTY_HEADER.to_string(),
            other => other.to_string(),
        };

        let mut name = raw.clone();
        let mut counter = 0;
        while headers.contains(&name) {
            counter += 1;
            name = format!("{raw}_{counter}");
        }
        if counter > 0 && raw != EMPTY_HEADER {
            warn!("⚠️  Duplicate header '{}' renamed to '{}'", raw, name);
        }
        headers.push(name);
    }
    headers
}

/// Value a row field sees. Error cells count as absent.
fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Error(_) => CellValue::Empty,
        other => raw_cell_value(other),
    }
}

/// Value carried through to the output copy of an input sheet. Error cells
/// keep their displayed text (`#DIV/0!`).
fn raw_cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(text) => CellValue::Text(text.clone()),
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::Float(value) => CellValue::Number(*value),
        Data::Bool(value) => CellValue::Bool(*value),
        Data::DateTime(value) => CellValue::Number(value.as_f64()),
        Data::DateTimeIso(text) | Data::DurationIso(text) => CellValue::Text(text.clone()),
        Data::Error(error) => CellValue::Text(error.to_string()),
    }
}
