//! Row Sources
//!
//! Converts an uploaded workbook into the row table the rule engine consumes.
//!
//! ```text
//! Workbook bytes (.xlsx, .xls)
//!     ↓
//! [RowSource]
//!     ↓
//! SourceWorkbook
//!     ├── sheets: Vec<RawSheet>      → copied into the output as-is
//!     └── first_sheet: SourceSheet   → [RuleEngine]
//! ```

pub mod source;
pub mod xlsx;

pub use source::{RawSheet, RowSource, SourceSheet, SourceWorkbook};
pub use xlsx::CalamineRowSource;
