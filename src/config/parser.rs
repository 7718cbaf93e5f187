//! Source assembly and record binding from CLI arguments

use crate::{
    binder::{BindOptions, Bindable, Binder},
    cli::Cli,
    config::{
        env::EnvManager,
        flatten::load_document,
        validation::{ConfigValidator, ValidationWarning},
    },
    error::{AppError, Result},
    models::{ConfigRecord, PropertySource},
};
use std::path::{Path, PathBuf};

/// Name of the source holding `--set` overrides
pub const OVERRIDE_SOURCE_NAME: &str = "command-line";

/// Where environment variables come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentInput {
    /// Neither `.env` nor the process environment are read
    Disabled,
    /// The `.env` file (if present) and the process environment
    Process,
    /// The `.env` file (if present) and a fixed variable list
    Fixed(Vec<(String, String)>),
}

/// Assembles the ordered source list, lowest precedence first:
/// named documents, default document, `.env` file, environment, overrides
#[derive(Debug, Clone)]
pub struct SourceLoader {
    prefix: String,
    named_documents: Vec<PathBuf>,
    default_document: Option<PathBuf>,
    search_dir: PathBuf,
    env_file: PathBuf,
    environment: EnvironmentInput,
    overrides: Vec<(String, String)>,
}

impl SourceLoader {
    pub fn new<S: Into<String>>(prefix: S) -> Self {
        Self {
            prefix: prefix.into(),
            named_documents: Vec::new(),
            default_document: None,
            search_dir: PathBuf::from("."),
            env_file: PathBuf::from(crate::defaults::DEFAULT_ENV_FILE),
            environment: EnvironmentInput::Process,
            overrides: Vec::new(),
        }
    }

    /// Supplementary documents, bound in the given order below the default document
    pub fn with_named_documents<I: IntoIterator<Item = PathBuf>>(mut self, paths: I) -> Self {
        self.named_documents.extend(paths);
        self
    }

    /// Explicit default document; it must exist
    pub fn with_default_document(mut self, path: Option<PathBuf>) -> Self {
        self.default_document = path;
        self
    }

    /// Directory searched for `application.*` when no default document is given
    pub fn with_search_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.search_dir = dir.into();
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.env_file = path.into();
        self
    }

    pub fn with_environment(mut self, environment: EnvironmentInput) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_overrides<I: IntoIterator<Item = (String, String)>>(mut self, overrides: I) -> Self {
        self.overrides.extend(overrides);
        self
    }

    /// First `application.*` document present in `dir`
    pub fn find_default_document(dir: &Path) -> Option<PathBuf> {
        crate::defaults::DEFAULT_DOCUMENTS
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Read every configured source
    pub fn load(&self) -> Result<Vec<PropertySource>> {
        let mut sources = Vec::new();

        for path in &self.named_documents {
            if !path.is_file() {
                return Err(AppError::config(format!("Named document not found: {}", path.display())));
            }
            sources.push(load_document(path)?);
        }

        let default_document = match &self.default_document {
            Some(path) if !path.is_file() => {
                return Err(AppError::config(format!("Config document not found: {}", path.display())));
            }
            Some(path) => Some(path.clone()),
            None => Self::find_default_document(&self.search_dir),
        };
        if let Some(path) = default_document {
            sources.push(load_document(&path)?);
        }

        if self.environment != EnvironmentInput::Disabled {
            if let Some(source) = EnvManager::env_file_source(&self.env_file, &self.prefix)? {
                sources.push(source);
            }
            let environment = match &self.environment {
                EnvironmentInput::Fixed(vars) => {
                    EnvManager::environment_source("environment", &self.prefix, vars.iter().cloned())
                }
                _ => EnvManager::process_environment_source(&self.prefix),
            };
            if !environment.is_empty() {
                sources.push(environment);
            }
        }

        if !self.overrides.is_empty() {
            sources.push(PropertySource::from_pairs(OVERRIDE_SOURCE_NAME, self.overrides.iter().cloned()));
        }

        Ok(sources)
    }
}

/// Name and size of one loaded source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSummary {
    pub name: String,
    pub entries: usize,
}

/// A bound and validated record together with how it was assembled
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub record: ConfigRecord,
    /// Sources in precedence order, lowest first
    pub sources: Vec<SourceSummary>,
    pub matched_keys: usize,
    pub skipped: Vec<String>,
    pub unknown: Vec<String>,
    pub warnings: Vec<ValidationWarning>,
}

/// Bind and validate a record from already loaded sources
pub fn bind_sources(sources: &[PropertySource], options: BindOptions) -> Result<LoadedConfig> {
    let prefix = options.prefix.clone().unwrap_or_else(|| ConfigRecord::PREFIX.to_string());
    let outcome = Binder::new(options).bind_with_report::<ConfigRecord>(sources)?;
    let warnings = ConfigValidator::validate_comprehensive(&outcome.record, &prefix)?;

    Ok(LoadedConfig {
        record: outcome.record,
        sources: sources
            .iter()
            .map(|source| SourceSummary {
                name: source.name.clone(),
                entries: source.len(),
            })
            .collect(),
        matched_keys: outcome.matched_keys,
        skipped: outcome.skipped,
        unknown: outcome.unknown,
        warnings,
    })
}

/// Configuration parser that turns CLI arguments into a bound record
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Source loader configured from the CLI flags
    pub fn source_loader(&self) -> SourceLoader {
        let environment = if self.cli.no_env {
            EnvironmentInput::Disabled
        } else {
            EnvironmentInput::Process
        };

        SourceLoader::new(self.cli.prefix.trim())
            .with_named_documents(self.cli.sources.iter().cloned())
            .with_default_document(self.cli.config.clone())
            .with_env_file(self.cli.env_file.clone())
            .with_environment(environment)
            .with_overrides(self.cli.overrides.iter().cloned())
    }

    /// Load sources, bind and validate
    pub fn parse(&self) -> Result<LoadedConfig> {
        self.cli.validate().map_err(AppError::config)?;
        let sources = self.source_loader().load()?;
        bind_sources(&sources, self.cli.bind_options())
    }
}

/// Convenience function to load the bound record from CLI arguments
pub fn load_config(cli: Cli) -> Result<LoadedConfig> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &LoadedConfig) -> String {
    let mut summary = Vec::new();

    if config.sources.is_empty() {
        summary.push("Sources: none".to_string());
    } else {
        summary.push("Sources (lowest precedence first):".to_string());
        for source in &config.sources {
            summary.push(format!("  {} ({} entries)", source.name, source.entries));
        }
    }
    summary.push(format!("Matched keys: {}", config.matched_keys));
    if !config.skipped.is_empty() {
        summary.push(format!("Skipped keys: {}", config.skipped.join(", ")));
    }
    if !config.unknown.is_empty() {
        summary.push(format!("Unknown keys: {}", config.unknown.join(", ")));
    }
    summary.push(format!("Warnings: {}", config.warnings.len()));

    summary.join("\n")
}
