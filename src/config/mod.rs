//! Configuration source loading, flattening and validation

pub mod env;
pub mod flatten;
pub mod parser;
pub mod validation;

// Re-export main functionality
pub use env::EnvManager;
pub use flatten::{load_document, parse_document, DocumentFormat};
pub use parser::{
    bind_sources, display_config_summary, load_config, ConfigParser, EnvironmentInput, LoadedConfig,
    SourceLoader, SourceSummary,
};
pub use validation::{ConfigValidator, ValidationLevel, ValidationWarning};
