use crate::classifier::ReportClassifier;
use crate::config::SplitterConfig;
use crate::error::SplitError;
use crate::profiler::StepProfiler;
use crate::rules::{ProcessOutcome, RuleEngine};
use crate::serialization::{TableSetWriter, XlsxTableSetWriter};
use crate::sources::{CalamineRowSource, RowSource, SourceWorkbook};
use crate::types::*;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// SHA-256 of the uploaded bytes, hex encoded
pub fn calculate_input_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// `{prefix}_{unix_millis}_{original name}`
pub fn output_file_name(prefix: &str, source_filename: &str, at: DateTime<Utc>) -> String {
    format!("{}_{}_{}", prefix, at.timestamp_millis(), source_filename)
}

/// Upload → classify → extract → split → serialize.
pub struct SplitProcessor {
    source: Box<dyn RowSource + Send + Sync>,
    writer: Box<dyn TableSetWriter + Send + Sync>,
    classifier: ReportClassifier,
    rule_engine: RuleEngine,
}

impl SplitProcessor {
    /// Create SplitProcessor with full dependency injection
    pub fn new_with_dependencies(
        source: Box<dyn RowSource + Send + Sync>,
        writer: Box<dyn TableSetWriter + Send + Sync>,
    ) -> Result<Self> {
        Ok(Self {
            source,
            writer,
            classifier: ReportClassifier::new()?,
            rule_engine: RuleEngine::new(),
        })
    }

    /// calamine in, rust_xlsxwriter out
    pub fn new_xlsx() -> Result<Self> {
        Self::new_with_dependencies(
            Box::new(CalamineRowSource::new()),
            Box::new(XlsxTableSetWriter::new()),
        )
    }

    pub fn classifier(&self) -> &ReportClassifier {
        &self.classifier
    }

    /// Explicit label wins; otherwise the file name has to classify.
    pub fn resolve_report_type(
        &self,
        source_filename: &str,
        label: Option<&str>,
    ) -> Result<ReportType, SplitError> {
        match label {
            Some(label) => label.parse(),
            None => self.classifier.classify_or_reject(source_filename),
        }
    }

    /// Reject files by extension before any bytes are read.
    pub fn check_extension(&self, source_filename: &str, config: &SplitterConfig) -> Result<(), SplitError> {
        let extension = Path::new(source_filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        if config.is_allowed_extension(extension) {
            Ok(())
        } else {
            Err(SplitError::UnsupportedFileFormat {
                extension: extension.to_string(),
                allowed: config.allowed_extensions.join(", "),
            })
        }
    }

    pub fn check_size(&self, size: u64, config: &SplitterConfig) -> Result<(), SplitError> {
        if size > config.max_file_size_bytes {
            Err(SplitError::FileTooLarge {
                size,
                limit: config.max_file_size_bytes,
            })
        } else {
            Ok(())
        }
    }

    /// Process a workbook on disk, classifying it by file name.
    pub fn process_file(&self, input_path: &Path, config: &SplitterConfig) -> Result<ProcessedReport> {
        self.process_file_with_options(input_path, None, config, &mut StepProfiler::disabled())
    }

    pub fn process_file_with_options(
        &self,
        input_path: &Path,
        report_label: Option<&str>,
        config: &SplitterConfig,
        profiler: &mut StepProfiler,
    ) -> Result<ProcessedReport> {
        let source_filename = input_path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Invalid input path: {}", input_path.display()))?
            .to_string();

        // Cheap rejections first: nothing is read for a bad name or an oversized file
        self.check_extension(&source_filename, config)?;
        let report_type = self.resolve_report_type(&source_filename, report_label)?;
        let size = std::fs::metadata(input_path)
            .with_context(|| format!("Failed to stat {}", input_path.display()))?
            .len();
        self.check_size(size, config)?;

        let bytes = profiler.time_step("read file", || std::fs::read(input_path))
            .with_context(|| format!("Failed to read {}", input_path.display()))?;

        self.process_bytes(&source_filename, &bytes, report_type, config, profiler)
    }

    /// Process an already-loaded upload whose report type is known.
    pub fn process_bytes(
        &self,
        source_filename: &str,
        bytes: &[u8],
        report_type: ReportType,
        config: &SplitterConfig,
        profiler: &mut StepProfiler,
    ) -> Result<ProcessedReport> {
        let start_time = Instant::now();
        self.check_size(bytes.len() as u64, config)?;
        info!("📄 Processing {} as {}", source_filename, report_type);

        let input_sha256 = profiler.time_step("input digest", || calculate_input_hash(bytes));

        let source = profiler
            .time_rows(
                "read workbook",
                || self.source.read_workbook(bytes),
                |read: &Result<SourceWorkbook, SplitError>| read.as_ref().map_or(0, |wb| wb.first_sheet.rows.len()),
            )
            .with_context(|| format!("{} could not read {}", self.source.name(), source_filename))?;

        let outcome = self.split(report_type, &source, profiler);

        let workbook = profiler
            .time_step("write workbook", || self.assemble(&source, &outcome, config))
            .with_context(|| format!("{} could not write output workbook", self.writer.name()))?;

        let processed_at = Utc::now();
        let summary = ProcessingSummary {
            filename: output_file_name(&config.output_prefix, source_filename, processed_at),
            source_filename: source_filename.to_string(),
            report_type,
            original_rows: outcome.original_rows,
            worksheets: outcome.segments,
            input_sha256,
            processed_at,
        };

        profiler.log_summary();
        info!(
            "⏱️  Total processing time: {:.3}s",
            start_time.elapsed().as_secs_f64()
        );

        Ok(ProcessedReport { summary, workbook })
    }

    /// Run the segment rules over the first sheet's rows.
    pub fn split(
        &self,
        report_type: ReportType,
        source: &SourceWorkbook,
        profiler: &mut StepProfiler,
    ) -> ProcessOutcome {
        self.rule_engine
            .process_profiled(report_type, &source.first_sheet.rows, profiler)
    }

    /// Output workbook: the uploaded sheets as they were (when configured),
    /// followed by the segment sheets.
    pub fn assemble(
        &self,
        source: &SourceWorkbook,
        outcome: &ProcessOutcome,
        config: &SplitterConfig,
    ) -> Result<Vec<u8>, SplitError> {
        if config.keep_input_sheets {
            self.writer.write_over(&source.sheets, &outcome.table_set)
        } else {
            self.writer.write_workbook(&outcome.table_set)
        }
    }
}
