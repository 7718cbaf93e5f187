//! Type definitions and aliases

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Declared type of a bindable field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueKind {
    /// Plain text, taken as-is
    Text,
    /// Decimal integer
    Integer,
    /// `true` / `false`, case-insensitive
    Boolean,
    /// Calendar date/time in one of the recognized formats
    DateTime,
    /// Map of opaque sub-keys to text, accumulated across sources
    Mapping,
    /// Indexed list of opaque text values
    Sequence,
    /// Nested structure bound against its own field table
    Nested(&'static [FieldSpec]),
}

impl ValueKind {
    /// Name used in bind errors
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Integer => "integer",
            ValueKind::Boolean => "boolean",
            ValueKind::DateTime => "date/time",
            ValueKind::Mapping => "mapping",
            ValueKind::Sequence => "sequence",
            ValueKind::Nested(_) => "nested structure",
        }
    }

    /// Whether the field is populated from nested or indexed keys
    pub fn is_compound(&self) -> bool {
        matches!(self, ValueKind::Mapping | ValueKind::Sequence | ValueKind::Nested(_))
    }
}

/// One row of a field registration table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Canonical (camelCase) field name
    pub name: &'static str,
    /// Alternative names that bind the same field
    pub aliases: &'static [&'static str],
    /// Declared type
    pub kind: ValueKind,
    /// Raw text applied when no source defines the field
    pub default: Option<&'static str>,
}

impl FieldSpec {
    /// A field with no aliases and no default
    pub const fn new(name: &'static str, kind: ValueKind) -> Self {
        Self { name, aliases: &[], kind, default: None }
    }

    /// Add alias names
    pub const fn with_aliases(self, aliases: &'static [&'static str]) -> Self {
        Self { aliases, ..self }
    }

    /// Add a raw text default
    pub const fn with_default(self, default: &'static str) -> Self {
        Self { default: Some(default), ..self }
    }

    /// Canonical name followed by aliases
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.name).chain(self.aliases.iter().copied())
    }
}

/// Bound fields of one structure, keyed by canonical field name
pub type BoundFields = BTreeMap<&'static str, BoundValue>;

/// A coerced value handed to a bindable type
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    Text(String),
    Integer(i32),
    Boolean(bool),
    DateTime(NaiveDateTime),
    Mapping(BTreeMap<String, String>),
    Sequence(Vec<String>),
    Nested(BoundFields),
}

impl BoundValue {
    /// Kind name of the carried value
    pub fn type_name(&self) -> &'static str {
        match self {
            BoundValue::Text(_) => "text",
            BoundValue::Integer(_) => "integer",
            BoundValue::Boolean(_) => "boolean",
            BoundValue::DateTime(_) => "date/time",
            BoundValue::Mapping(_) => "mapping",
            BoundValue::Sequence(_) => "sequence",
            BoundValue::Nested(_) => "nested structure",
        }
    }
}

/// Output format of the bound record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Single-line `Person{...}` rendering
    Text,
    /// Pretty-printed JSON
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
