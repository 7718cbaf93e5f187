//! Command-line interface

use crate::{binder::BindOptions, config::EnvManager, types::OutputFormat};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Property Binder - binds layered configuration documents onto a typed record
#[derive(Parser, Debug, Clone)]
#[command(name = "propbind")]
#[command(version, about, long_about = None)]
#[command(after_help = EnvManager::display_env_help(crate::defaults::DEFAULT_PREFIX))]
pub struct Cli {
    /// Default document (otherwise application.yml/.yaml/.properties/.json in the working directory)
    #[arg(short, long, value_name = "PATH", env = "PROPBIND_CONFIG")]
    pub config: Option<PathBuf>,

    /// Supplementary named document, lower precedence than the default document (repeatable)
    #[arg(long = "source", value_name = "PATH", action = ArgAction::Append)]
    pub sources: Vec<PathBuf>,

    /// Override a property, highest precedence (repeatable)
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE", value_parser = parse_override, action = ArgAction::Append)]
    pub overrides: Vec<(String, String)>,

    /// Namespace to bind the record from
    #[arg(short, long, default_value = crate::defaults::DEFAULT_PREFIX)]
    pub prefix: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Fail when a single value is given for a mapping, list or nested field
    #[arg(long)]
    pub strict: bool,

    /// Fail on keys under the prefix that match no field
    #[arg(long)]
    pub deny_unknown: bool,

    /// Ignore the .env file and process environment
    #[arg(long)]
    pub no_env: bool,

    /// Environment file to read
    #[arg(long, value_name = "PATH", default_value = crate::defaults::DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Print an example .env file for the prefix and exit
    #[arg(long)]
    pub example_env: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        let prefix = self.prefix.trim();
        if prefix.is_empty() {
            return Err("--prefix must not be empty".to_string());
        }
        if prefix.contains(['[', ']']) || prefix.starts_with('.') || prefix.ends_with('.') {
            return Err(format!("Invalid prefix '{}': use dotted names such as 'app.owner'", self.prefix));
        }

        Ok(())
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }

    /// Binder options selected by the flags
    pub fn bind_options(&self) -> BindOptions {
        BindOptions::new()
            .with_prefix(self.prefix.trim())
            .strict_nested(self.strict)
            .ignore_unknown_fields(!self.deny_unknown)
    }

    /// Get configuration summary for display
    pub fn get_config_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("Configuration Summary:\n");
        summary.push_str(&format!("  Prefix: {}\n", self.prefix));
        match &self.config {
            Some(path) => summary.push_str(&format!("  Default document: {}\n", path.display())),
            None => summary.push_str("  Default document: (search working directory)\n"),
        }
        for source in &self.sources {
            summary.push_str(&format!("  Named document: {}\n", source.display()));
        }
        if !self.overrides.is_empty() {
            summary.push_str(&format!("  Overrides: {}\n", self.overrides.len()));
        }
        summary.push_str(&format!("  Environment: {}\n", if self.no_env { "ignored" } else { "read" }));
        summary.push_str(&format!("  Strict nested: {}\n", self.strict));
        summary.push_str(&format!("  Deny unknown: {}\n", self.deny_unknown));
        summary.push_str(&format!("  Output format: {}\n", self.format));

        summary
    }
}

/// Parse a `KEY=VALUE` override; the value may be empty or contain `=`
fn parse_override(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid override '{}': expected KEY=VALUE", s))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("Invalid override '{}': key is empty", s));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
