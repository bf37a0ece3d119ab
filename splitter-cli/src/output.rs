use anyhow::{Context, Result};
use splitter_core::ProcessedReport;
use std::path::{Path, PathBuf};

/// `--output` wins; otherwise the generated file name inside `--output-dir`.
pub fn output_path(explicit: Option<&str>, output_dir: &str, generated_name: &str) -> PathBuf {
    match explicit {
        Some(path) => PathBuf::from(path),
        None => Path::new(output_dir).join(generated_name),
    }
}

/// Summary JSON sits next to the workbook with a `.json` extension.
pub fn default_summary_path(workbook_path: &Path) -> PathBuf {
    workbook_path.with_extension("json")
}

/// Write the workbook and, when a path is given, the JSON summary.
pub fn write_outputs(report: &ProcessedReport, workbook_path: &Path, summary_path: Option<&Path>) -> Result<()> {
    if let Some(parent) = workbook_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }
    std::fs::write(workbook_path, &report.workbook)
        .with_context(|| format!("Failed to write workbook {}", workbook_path.display()))?;

    if let Some(path) = summary_path {
        report
            .summary
            .save_to_json(path)
            .with_context(|| format!("Failed to write summary {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use splitter_core::{ProcessingSummary, ReportType, SegmentSummary};

    fn report() -> ProcessedReport {
        ProcessedReport {
            summary: ProcessingSummary {
                filename: "processed_1700000000000_Sales Item NZ.xlsx".to_string(),
                source_filename: "Sales Item NZ.xlsx".to_string(),
                report_type: ReportType::SalesNz,
                original_rows: 2,
                worksheets: vec![SegmentSummary { name: "NZ".to_string(), rows: 1 }],
                input_sha256: "0".repeat(64),
                processed_at: Utc::now(),
            },
            workbook: vec![0x50, 0x4b, 0x03, 0x04],
        }
    }

    #[test]
    fn test_explicit_output_wins() {
        let path = output_path(Some("out/report.xlsx"), "ignored", "processed_1_x.xlsx");
        assert_eq!(path, PathBuf::from("out/report.xlsx"));
    }

    #[test]
    fn test_generated_name_goes_in_output_dir() {
        let path = output_path(None, "exports", "processed_1_Sales Item NZ.xlsx");
        assert_eq!(path, PathBuf::from("exports").join("processed_1_Sales Item NZ.xlsx"));
    }

    #[test]
    fn test_summary_path_swaps_extension() {
        let path = default_summary_path(Path::new("exports/processed_1_Sales Item NZ.xlsx"));
        assert_eq!(path, PathBuf::from("exports/processed_1_Sales Item NZ.json"));
    }

    #[test]
    fn test_write_outputs_creates_directory() {
        let dir = std::env::temp_dir().join("report_splitter_output_test");
        std::fs::remove_dir_all(&dir).ok();
        let workbook_path = dir.join("nested").join("out.xlsx");
        let summary_path = default_summary_path(&workbook_path);

        write_outputs(&report(), &workbook_path, Some(&summary_path)).unwrap();

        assert_eq!(std::fs::read(&workbook_path).unwrap(), vec![0x50, 0x4b, 0x03, 0x04]);
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&summary_path).unwrap()).unwrap();
        assert_eq!(json["reportType"], "Sales Item NZ");
        assert_eq!(json["worksheets"][0]["rows"], 1);

        std::fs::remove_dir_all(&dir).ok();
    }
}
