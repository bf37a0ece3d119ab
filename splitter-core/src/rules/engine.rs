use super::catalogue::{ReportDescriptor, SegmentRule};
use super::condition::project;
use crate::error::SplitError;
use crate::profiler::StepProfiler;
use crate::table_set::TableSet;
use crate::types::*;
use std::borrow::Cow;
use tracing::{debug, info};

/// Everything the engine produces for one input table.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutcome {
    pub report_type: ReportType,
    /// Row count of the input, before any filtering
    pub original_rows: usize,
    /// `{name, rows}` per segment rule, in rule order
    pub segments: Vec<SegmentSummary>,
    pub table_set: TableSet,
}

/// Applies a report type's segment rules to a table.
///
/// Stateless: one engine can serve any number of tables, from any thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEngine;

impl RuleEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn process(&self, report_type: ReportType, rows: &[Row]) -> ProcessOutcome {
        self.process_into(report_type, rows, TableSet::new())
    }

    /// Dispatch on a report-type label, rejecting labels outside the six known types.
    pub fn process_labelled(&self, label: &str, rows: &[Row]) -> Result<ProcessOutcome, SplitError> {
        let report_type: ReportType = label.parse()?;
        Ok(self.process(report_type, rows))
    }

    /// Run every segment rule and add the resulting sheets on top of `base`.
    ///
    /// A segment whose name already exists in `base` replaces that sheet.
    pub fn process_into(
        &self,
        report_type: ReportType,
        rows: &[Row],
        base: TableSet,
    ) -> ProcessOutcome {
        self.run(report_type, rows, base, &mut StepProfiler::disabled())
    }

    /// [`RuleEngine::process`], timing each segment rule on `profiler`.
    pub fn process_profiled(
        &self,
        report_type: ReportType,
        rows: &[Row],
        profiler: &mut StepProfiler,
    ) -> ProcessOutcome {
        self.run(report_type, rows, TableSet::new(), profiler)
    }

    fn run(
        &self,
        report_type: ReportType,
        rows: &[Row],
        base: TableSet,
        profiler: &mut StepProfiler,
    ) -> ProcessOutcome {
        let descriptor = report_type.descriptor();
        info!(
            "⚙️  Applying {} segment rules for {} to {} rows",
            descriptor.rules.len(),
            report_type,
            rows.len()
        );

        let prepared = profiler.time_step("derive columns", || Self::prepare_rows(descriptor, rows));

        let mut table_set = base;
        let mut segments = Vec::with_capacity(descriptor.rules.len());
        for rule in descriptor.rules {
            let segment = profiler.time_rows(
                &format!("segment {}", rule.sheet),
                || self.apply_rule(rule, &prepared, descriptor.projection),
                Segment::row_count,
            );
            info!("   ✅ {}: {} rows", segment.name, segment.row_count());
            segments.push(segment.summary());
            table_set.insert_sheet(segment.name, segment.rows);
        }

        ProcessOutcome {
            report_type,
            original_rows: rows.len(),
            segments,
            table_set,
        }
    }

    /// Filter the full table with one rule. Never sees another rule's output.
    pub fn apply_rule(
        &self,
        rule: &SegmentRule,
        rows: &[Row],
        projection: Option<&[&str]>,
    ) -> Segment {
        debug!("🔧 {}", rule.describe());
        let selected = rows.iter().filter(|row| rule.matches(row));
        let rows: Table = match projection {
            Some(columns) => selected.map(|row| project(row, columns)).collect(),
            None => selected.cloned().collect(),
        };
        Segment {
            name: rule.sheet.to_string(),
            rows,
        }
    }

    /// Add the derived column, if the report type has one.
    fn prepare_rows<'a>(descriptor: &ReportDescriptor, rows: &'a [Row]) -> Cow<'a, [Row]> {
        match descriptor.derived {
            Some(derived) => {
                debug!(
                    "➕ Deriving '{}' from {:?}",
                    derived.name, derived.sum_of
                );
                Cow::Owned(rows.iter().map(|row| derived.apply(row)).collect())
            }
            None => Cow::Borrowed(rows),
        }
    }
}
