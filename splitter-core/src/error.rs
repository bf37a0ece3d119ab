use thiserror::Error;

/// Errors raised by the classifier, rule engine and workbook boundaries.
///
/// Missing or malformed fields inside rows are never an error: they read as
/// their default value and simply fail the segment predicates.
#[derive(Error, Debug)]
pub enum SplitError {
    #[error("file name '{filename}' does not match any known report type")]
    UnrecognizedReportType { filename: String },

    #[error("unsupported report type: '{label}'")]
    UnsupportedReportType { label: String },

    #[error("unsupported file format '{extension}' (expected one of: {allowed})")]
    UnsupportedFileFormat { extension: String, allowed: String },

    #[error("file is {size} bytes, larger than the {limit} byte limit")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("workbook contains no worksheets")]
    EmptyWorkbook,

    #[error("failed to read workbook: {0}")]
    WorkbookRead(String),

    #[error("failed to write workbook: {0}")]
    WorkbookWrite(String),

    #[error("invalid sheet name '{name}': {reason}")]
    InvalidSheetName { name: String, reason: String },
}

impl From<calamine::Error> for SplitError {
    fn from(err: calamine::Error) -> Self {
        SplitError::WorkbookRead(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for SplitError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        SplitError::WorkbookWrite(err.to_string())
    }
}
