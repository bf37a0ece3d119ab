use crate::error::SplitError;
use crate::rules::DESCRIPTORS;
use crate::types::*;
use anyhow::Result;
use regex::{Regex, RegexBuilder};
use tracing::{debug, info, warn};

/// Keyword patterns for one report type. All of them must match.
#[derive(Debug, Clone)]
struct KeywordPattern {
    report_type: ReportType,
    keywords: Vec<Regex>,
}

impl KeywordPattern {
    fn is_match(&self, identifier: &str) -> bool {
        self.keywords.iter().all(|keyword| keyword.is_match(identifier))
    }
}

/// Maps an uploaded file name to its report type.
///
/// Each keyword is an independent case-insensitive substring test, so
/// `"INVENTORY enquiry au 2024.xlsx"` and `"AU_Enquiry-Inventory.xlsx"` both
/// classify as Inventory AU. Patterns are tried in descriptor-table order and
/// the first full match wins.
#[derive(Debug, Clone)]
pub struct ReportClassifier {
    patterns: Vec<KeywordPattern>,
}

impl ReportClassifier {
    pub fn new() -> Result<Self> {
        let mut patterns = Vec::with_capacity(DESCRIPTORS.len());
        for descriptor in &DESCRIPTORS {
            let keywords = descriptor
                .keywords
                .iter()
                .map(|keyword| {
                    RegexBuilder::new(&regex::escape(keyword))
                        .case_insensitive(true)
                        .build()
                })
                .collect::<Result<Vec<_>, _>>()?;
            patterns.push(KeywordPattern {
                report_type: descriptor.report_type,
                keywords,
            });
        }
        Ok(Self { patterns })
    }

    pub fn classify(&self, identifier: &str) -> Classification {
        debug!("🔍 Classifying '{identifier}'");

        match self
            .patterns
            .iter()
            .find(|pattern| pattern.is_match(identifier))
        {
            Some(pattern) => {
                info!("📋 '{}' classified as: {}", identifier, pattern.report_type);
                Classification::Recognized(pattern.report_type)
            }
            None => {
                warn!("⚠️  '{identifier}' matches no known report type");
                Classification::Unrecognized
            }
        }
    }

    /// Like [`ReportClassifier::classify`], but an unrecognized name is an error.
    pub fn classify_or_reject(&self, identifier: &str) -> Result<ReportType, SplitError> {
        self.classify(identifier)
            .report_type()
            .ok_or_else(|| SplitError::UnrecognizedReportType {
                filename: identifier.to_string(),
            })
    }
}
