use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_output_prefix() -> String {
    "processed".to_string()
}

fn default_max_file_size_bytes() -> u64 {
    50 * 1024 * 1024 // 50MB upload limit
}

fn default_allowed_extensions() -> Vec<String> {
    vec!["xlsx".to_string(), "xls".to_string()]
}

/// Processing options. Segment rules themselves are fixed per report type
/// and are not configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitterConfig {
    /// Copy every uploaded sheet into the output as it was, ahead of the
    /// segment sheets
    #[serde(default = "default_true", alias = "include_source_sheet")]
    pub keep_input_sheets: bool,
    /// Output file name is `{prefix}_{unix_millis}_{original name}`
    #[serde(default = "default_output_prefix")]
    pub output_prefix: String,
    /// Uploads larger than this are rejected before parsing
    #[serde(default = "default_max_file_size_bytes")]
    pub max_file_size_bytes: u64,
    /// Accepted file extensions, compared case-insensitively
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    /// Write the JSON processing summary next to the output workbook
    #[serde(default)]
    pub write_summary: bool,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            keep_input_sheets: true,
            output_prefix: default_output_prefix(),
            max_file_size_bytes: default_max_file_size_bytes(),
            allowed_extensions: default_allowed_extensions(),
            write_summary: false,
        }
    }
}

impl SplitterConfig {
    /// Load config from a YAML file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: SplitterConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                warn!("⚠️  {e:#}, using defaults");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    pub fn is_allowed_extension(&self, extension: &str) -> bool {
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(extension))
    }
}
