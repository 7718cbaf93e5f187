//! Core formatting trait and the plain and JSON implementations

use crate::{
    config::{display_config_summary, LoadedConfig},
    error::Result,
    models::ConfigRecord,
};
use serde_json::json;

/// Main trait for output formatting
pub trait RecordFormatter {
    /// Format the bound record
    fn format_record(&self, record: &ConfigRecord) -> Result<String>;

    /// Format how the record was assembled
    fn format_summary(&self, config: &LoadedConfig) -> Result<String>;
}

/// Single-line `Person{...}` text
#[derive(Debug, Clone, Default)]
pub struct PlainFormatter;

impl PlainFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl RecordFormatter for PlainFormatter {
    fn format_record(&self, record: &ConfigRecord) -> Result<String> {
        Ok(record.to_string())
    }

    fn format_summary(&self, config: &LoadedConfig) -> Result<String> {
        let mut output = display_config_summary(config);
        for warning in &config.warnings {
            output.push('\n');
            output.push_str(&warning.format(false));
        }
        Ok(output)
    }
}

/// Pretty-printed JSON, suitable for piping into other tools
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl RecordFormatter for JsonFormatter {
    fn format_record(&self, record: &ConfigRecord) -> Result<String> {
        Ok(serde_json::to_string_pretty(record)?)
    }

    fn format_summary(&self, config: &LoadedConfig) -> Result<String> {
        let sources: Vec<_> = config
            .sources
            .iter()
            .map(|source| json!({ "name": source.name, "entries": source.entries }))
            .collect();
        let warnings: Vec<_> = config
            .warnings
            .iter()
            .map(|warning| json!({ "level": warning.level.as_str(), "message": warning.message }))
            .collect();

        let summary = json!({
            "sources": sources,
            "matchedKeys": config.matched_keys,
            "skipped": config.skipped,
            "unknown": config.unknown,
            "warnings": warnings,
        });
        Ok(serde_json::to_string_pretty(&summary)?)
    }
}
