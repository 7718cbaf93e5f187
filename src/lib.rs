//! Property Binder
//!
//! Binds hierarchical, string-valued configuration from layered sources
//! (YAML, JSON and properties documents, `.env` files, environment variables
//! and command-line overrides) onto strongly typed records, with relaxed key
//! matching and typed coercion.

pub mod binder;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod types;

// Re-export commonly used types
pub use binder::{BindOptions, BindOutcome, Bindable, Binder};
pub use config::{load_config, ConfigParser, LoadedConfig, SourceLoader};
pub use error::{AppError, Result};
pub use models::{ConfigRecord, Pet, PropertySource};
pub use output::{ColoredFormatter, JsonFormatter, OutputFormatterFactory, PlainFormatter, RecordFormatter};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Build information emitted by build.rs
pub const BUILD_TIME: &str = env!("BUILD_TIME");
pub const GIT_COMMIT: &str = env!("GIT_COMMIT");
pub const TARGET_TRIPLE: &str = env!("TARGET_TRIPLE");

/// Default configuration values
pub mod defaults {
    /// Namespace the person record binds from
    pub const DEFAULT_PREFIX: &str = "person";

    /// Default documents searched in the working directory, first match wins
    pub const DEFAULT_DOCUMENTS: &[&str] = &[
        "application.yml",
        "application.yaml",
        "application.properties",
        "application.json",
    ];

    pub const DEFAULT_ENV_FILE: &str = ".env";
}
