//! Error handling for the property binder

use thiserror::Error;

/// Custom error types for the property binder
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    /// A present value could not be coerced to its field's declared type
    #[error("Bind error: cannot bind '{key}' as {expected_type} (value: '{raw_value}')")]
    Bind {
        key: String,
        expected_type: String,
        raw_value: String,
    },

    /// A flat value was supplied for a field that needs nested or indexed keys
    #[error("Unsupported nested access: '{key}' needs nested or indexed keys, not a single value")]
    UnsupportedNestedAccess { key: String },

    /// A key under the bound prefix matched no declared field
    #[error("Unknown property: '{key}' does not match any declared field")]
    UnknownProperty { key: String },

    /// Configuration-related errors (source assembly, missing documents)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors raised on a bound record
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// Parsing errors (document syntax)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new bind error
    pub fn bind<K, T, V>(key: K, expected_type: T, raw_value: V) -> Self
    where
        K: Into<String>,
        T: Into<String>,
        V: Into<String>,
    {
        Self::Bind {
            key: key.into(),
            expected_type: expected_type.into(),
            raw_value: raw_value.into(),
        }
    }

    /// Create a new unsupported nested access error
    pub fn unsupported_nested<S: Into<String>>(key: S) -> Self {
        Self::UnsupportedNestedAccess { key: key.into() }
    }

    /// Create a new unknown property error
    pub fn unknown_property<S: Into<String>>(key: S) -> Self {
        Self::UnknownProperty { key: key.into() }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// The configuration key this error refers to, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Bind { key, .. }
            | Self::UnsupportedNestedAccess { key }
            | Self::UnknownProperty { key } => Some(key),
            _ => None,
        }
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Bind { .. } => "BIND",
            Self::UnsupportedNestedAccess { .. } => "NESTED",
            Self::UnknownProperty { .. } => "UNKNOWN",
            Self::Config(_) => "CONFIG",
            Self::Validation(_) => "VALIDATION",
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Bind { key, expected_type, raw_value } => {
                format!("The value '{}' of '{}' is not a valid {}.\n\nSuggestion: Fix the value in the highest-precedence source that defines '{}'.", raw_value, key, expected_type, key)
            }
            Self::UnsupportedNestedAccess { key } => {
                format!("'{}' was given a single value but the field needs nested keys.\n\nSuggestion: Use '{}.<key>=value' for maps or '{}[0]=value' for lists, or drop --strict.", key, key, key)
            }
            Self::UnknownProperty { key } => {
                format!("'{}' does not match any known field.\n\nSuggestion: Check the spelling of the key or drop --deny-unknown.", key)
            }
            Self::Config(msg) => {
                format!("Configuration problem: {}\n\nSuggestion: Check the paths given with --config and --source.", msg)
            }
            Self::Validation(msg) => {
                format!("Invalid value: {}\n\nSuggestion: Correct the value in your configuration documents.", msg)
            }
            Self::Io(msg) => {
                format!("File operation failed: {}\n\nSuggestion: Check that the file exists and is readable.", msg)
            }
            Self::Parse(msg) => {
                format!("Failed to parse document: {}\n\nSuggestion: Check the YAML, JSON or properties syntax.", msg)
            }
            Self::Internal(msg) => {
                format!("Internal error: {}\n\nThis is likely a bug. Please report this issue with the error details.", msg)
            }
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Bind { .. }
            | Self::UnsupportedNestedAccess { .. }
            | Self::UnknownProperty { .. }
            | Self::Config(_)
            | Self::Validation(_)
            | Self::Parse(_) => 1,
            Self::Io(_) => 5,
            Self::Internal(_) => 99,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Bind { .. } | Self::UnsupportedNestedAccess { .. } | Self::UnknownProperty { .. } => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::Config(_) | Self::Validation(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Io(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::parse(format!("YAML parse error: {}", error))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON parse error: {}", error))
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!("Environment file error: {}", error))
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::parse(format!("Integer parse error: {}", error))
    }
}

impl From<chrono::ParseError> for AppError {
    fn from(error: chrono::ParseError) -> Self {
        Self::parse(format!("Date parse error: {}", error))
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Error context trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let original_error = e.into();
            let context = f();
            match original_error {
                // Keep the category (and exit code) of the wrapped error
                AppError::Io(msg) => AppError::io(format!("{}: {}", context, msg)),
                AppError::Parse(msg) => AppError::parse(format!("{}: {}", context, msg)),
                AppError::Config(msg) => AppError::config(format!("{}: {}", context, msg)),
                other => AppError::internal(format!("{}: {}", context, other)),
            }
        })
    }
}

/// Error reporter for structured error logging and user feedback
pub struct ErrorReporter {
    pub use_color: bool,
    pub verbose: bool,
}

impl ErrorReporter {
    /// Create a new error reporter
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    /// Report an error to the user
    pub fn report_error(&self, error: &AppError) {
        eprintln!("{}", self.render(error));
    }

    /// Render the text `report_error` prints
    pub fn render(&self, error: &AppError) -> String {
        let mut out = error.format_for_console(self.use_color);
        if self.verbose {
            out.push_str("\n\n");
            out.push_str(&error.user_friendly_message());
        }
        out
    }
}
