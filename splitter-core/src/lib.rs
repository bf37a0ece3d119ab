// Report Splitter Core Library
//
// Classifies AU/NZ warehouse report exports by file name and splits them into
// one worksheet per warehouse segment. Main interface is SplitProcessor; the
// classifier and rule engine can also be used on their own.

pub mod types;
pub mod error;
pub mod classifier;
pub mod rules;
pub mod table_set;
pub mod sources;
pub mod serialization;
pub mod config;
pub mod profiler;
pub mod processor;

// Re-export main types and functions for easy use
pub use types::*;
pub use error::SplitError;
pub use classifier::ReportClassifier;
pub use rules::{numeric_field, ProcessOutcome, RuleEngine};
pub use table_set::{Sheet, TableSet};
pub use sources::{CalamineRowSource, RawSheet, RowSource, SourceSheet, SourceWorkbook};
pub use serialization::{TableSetWriter, XlsxTableSetWriter};
pub use config::SplitterConfig;
pub use profiler::{StepProfiler, StepTiming};
pub use processor::SplitProcessor;
