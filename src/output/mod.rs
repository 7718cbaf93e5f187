//! Output formatting of the bound record
//!
//! Text output mirrors the record's `Display` form (optionally colored);
//! JSON output uses the record's serde representation.

mod colored;
mod formatter;

pub use self::colored::{ColorScheme, ColoredFormatter};
pub use formatter::{JsonFormatter, PlainFormatter, RecordFormatter};

use crate::types::OutputFormat;

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter for the requested format; color applies to text only
    pub fn create_formatter(format: OutputFormat, enable_color: bool) -> Box<dyn RecordFormatter> {
        match format {
            OutputFormat::Json => Box::new(JsonFormatter::new()),
            OutputFormat::Text if enable_color => Box::new(ColoredFormatter::new()),
            OutputFormat::Text => Box::new(PlainFormatter::new()),
        }
    }
}
