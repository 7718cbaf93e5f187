//! Flattening of configuration documents into dotted-path sources

use crate::{
    error::{AppError, ErrorContext, Result},
    models::PropertySource,
};
use serde::Deserialize;
use std::path::Path;

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
    Properties,
}

impl DocumentFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "yml" | "yaml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            "properties" => Ok(Self::Properties),
            other => Err(AppError::config(format!(
                "Unsupported document type '{}' for {} (expected .yml, .yaml, .json or .properties)",
                other,
                path.display()
            ))),
        }
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn flatten_yaml_value(prefix: &str, value: &serde_yaml::Value, out: &mut PropertySource) {
    use serde_yaml::Value;

    match value {
        Value::Null => {}
        Value::Bool(b) => out.insert(prefix, b.to_string()),
        Value::Number(n) => out.insert(prefix, n.to_string()),
        Value::String(s) => out.insert(prefix, s.as_str()),
        Value::Sequence(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_yaml_value(&format!("{}[{}]", prefix, index), item, out);
            }
        }
        Value::Mapping(map) => {
            for (key, item) in map {
                let key = match key {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    // Composite keys have no dotted form
                    _ => continue,
                };
                flatten_yaml_value(&join(prefix, &key), item, out);
            }
        }
        Value::Tagged(tagged) => flatten_yaml_value(prefix, &tagged.value, out),
    }
}

fn flatten_json_value(prefix: &str, value: &serde_json::Value, out: &mut PropertySource) {
    use serde_json::Value;

    match value {
        Value::Null => {}
        Value::Bool(b) => out.insert(prefix, b.to_string()),
        Value::Number(n) => out.insert(prefix, n.to_string()),
        Value::String(s) => out.insert(prefix, s.as_str()),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_json_value(&format!("{}[{}]", prefix, index), item, out);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                flatten_json_value(&join(prefix, key), item, out);
            }
        }
    }
}

/// Flatten a YAML stream; later documents in a multi-document stream take precedence
pub fn flatten_yaml(name: &str, text: &str) -> Result<PropertySource> {
    let mut source = PropertySource::new(name);
    for document in serde_yaml::Deserializer::from_str(text) {
        let value = serde_yaml::Value::deserialize(document)?;
        flatten_yaml_value("", &value, &mut source);
    }
    Ok(source)
}

/// Flatten a JSON document
pub fn flatten_json(name: &str, text: &str) -> Result<PropertySource> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let mut source = PropertySource::new(name);
    flatten_json_value("", &value, &mut source);
    Ok(source)
}

/// Parse `key=value` / `key: value` lines; `#` and `!` start comments
pub fn parse_properties(name: &str, text: &str) -> Result<PropertySource> {
    let mut source = PropertySource::new(name);
    let mut pending = String::new();

    for line in text.lines() {
        let line = line.trim_start();
        if pending.is_empty() && (line.is_empty() || line.starts_with('#') || line.starts_with('!')) {
            continue;
        }

        // A trailing backslash continues the logical line
        if let Some(stripped) = line.strip_suffix('\\') {
            pending.push_str(stripped);
            continue;
        }
        pending.push_str(line);

        let logical = std::mem::take(&mut pending);
        let (key, value) = match logical.find(|c: char| c == '=' || c == ':') {
            Some(split) => (&logical[..split], &logical[split + 1..]),
            None => (logical.as_str(), ""),
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(AppError::parse(format!("{}: line '{}' has an empty key", name, logical)));
        }
        source.insert(key, value.trim());
    }

    if !pending.is_empty() {
        return Err(AppError::parse(format!("{}: file ends inside a continued line", name)));
    }
    Ok(source)
}

/// Parse document text in the given format
pub fn parse_document(name: &str, text: &str, format: DocumentFormat) -> Result<PropertySource> {
    match format {
        DocumentFormat::Yaml => flatten_yaml(name, text),
        DocumentFormat::Json => flatten_json(name, text),
        DocumentFormat::Properties => parse_properties(name, text),
    }
}

/// Read and flatten a document file; the source is named `file:<path>`
pub fn load_document(path: &Path) -> Result<PropertySource> {
    let format = DocumentFormat::from_path(path)?;
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = format!("file:{}", path.display());
    parse_document(&name, &text, format).with_context(|| format!("In {}", path.display()))
}
