//! Colored formatter implementation with terminal color support

use super::formatter::{PlainFormatter, RecordFormatter};
use crate::{
    config::{LoadedConfig, ValidationLevel},
    error::Result,
    models::{ConfigRecord, Pet},
};
use colored::*;
use std::fmt::Display;

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub field: Color,
    pub text: Color,
    pub scalar: Color,
    pub warning: Color,
    pub info: Color,
    pub muted: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            field: Color::Cyan,
            text: Color::Green,
            scalar: Color::Yellow,
            warning: Color::Yellow,
            info: Color::Blue,
            muted: Color::BrightBlack,
        }
    }
}

/// Same layout as [`PlainFormatter`] with colored names and values
pub struct ColoredFormatter {
    plain_formatter: PlainFormatter,
    color_scheme: ColorScheme,
}

impl Default for ColoredFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ColoredFormatter {
    pub fn new() -> Self {
        Self::with_scheme(ColorScheme::default())
    }

    pub fn with_scheme(color_scheme: ColorScheme) -> Self {
        Self {
            plain_formatter: PlainFormatter::new(),
            color_scheme,
        }
    }

    fn field(&self, name: &str, value: String) -> String {
        format!("{}={}", name.color(self.color_scheme.field), value)
    }

    fn null(&self) -> String {
        "null".color(self.color_scheme.muted).to_string()
    }

    fn text(&self, value: &Option<String>) -> String {
        match value {
            Some(v) => format!("'{}'", v).color(self.color_scheme.text).to_string(),
            None => self.null(),
        }
    }

    fn scalar<T: Display>(&self, value: &Option<T>) -> String {
        match value {
            Some(v) => v.to_string().color(self.color_scheme.scalar).to_string(),
            None => self.null(),
        }
    }

    fn pet(&self, pet: &Option<Pet>) -> String {
        match pet {
            Some(pet) => format!(
                "{}{{{}, {}}}",
                "Pet".bold(),
                self.field("name", self.text(&pet.name)),
                self.field("breed", self.text(&pet.breed))
            ),
            None => self.null(),
        }
    }
}

impl RecordFormatter for ColoredFormatter {
    fn format_record(&self, record: &ConfigRecord) -> Result<String> {
        let attributes: Vec<String> = record
            .attributes
            .iter()
            .map(|(k, v)| format!("{}={}", k, v.color(self.color_scheme.text)))
            .collect();
        let tags: Vec<String> = record
            .tags
            .iter()
            .map(|tag| tag.color(self.color_scheme.text).to_string())
            .collect();

        let fields = [
            self.field("lastName", self.text(&record.last_name)),
            self.field("age", self.scalar(&record.age)),
            self.field("isOwner", self.scalar(&record.is_owner)),
            self.field("birthDate", self.scalar(&record.birth_date)),
            self.field("attributes", format!("{{{}}}", attributes.join(", "))),
            self.field("tags", format!("[{}]", tags.join(", "))),
            self.field("pet", self.pet(&record.pet)),
        ];
        Ok(format!("{}{{{}}}", "Person".bold(), fields.join(", ")))
    }

    fn format_summary(&self, config: &LoadedConfig) -> Result<String> {
        let mut output = String::new();
        output.push_str(&"Binding summary".color(self.color_scheme.header).bold().to_string());
        output.push('\n');

        let plain = self.plain_formatter.format_summary(&LoadedConfig {
            warnings: Vec::new(),
            ..config.clone()
        })?;
        output.push_str(&plain.color(self.color_scheme.muted).to_string());

        for warning in &config.warnings {
            let color = match warning.level {
                ValidationLevel::Info => self.color_scheme.info,
                ValidationLevel::Warning => self.color_scheme.warning,
            };
            output.push('\n');
            output.push_str(&format!("[{}] {}", warning.level.as_str().color(color), warning.message));
        }
        Ok(output)
    }
}
