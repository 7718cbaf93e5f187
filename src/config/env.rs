//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use crate::models::PropertySource;
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Variable name prefix for a binding prefix: `person` -> `PERSON_`, `app.owner` -> `APP_OWNER_`
    pub fn env_prefix(prefix: &str) -> String {
        let mut name: String = prefix
            .chars()
            .filter(|c| *c != '-')
            .map(|c| if c == '.' { '_' } else { c.to_ascii_uppercase() })
            .collect();
        name.push('_');
        name
    }

    /// Dotted key for an environment variable name.
    ///
    /// Underscores become dots and purely numeric parts become indices, so
    /// `PERSON_PET_NAME` maps to `person.pet.name` and `PERSON_LIST_0` to
    /// `person.list[0]`. A multi-word field has to be written without a
    /// separator (`PERSON_LASTNAME`), since `PERSON_LAST_NAME` reads as
    /// `person.last.name`.
    pub fn key_for_variable(variable: &str) -> String {
        let mut key = String::new();
        for part in variable.split('_').filter(|part| !part.is_empty()) {
            if part.chars().all(|c| c.is_ascii_digit()) {
                key.push('[');
                key.push_str(part);
                key.push(']');
            } else {
                if !key.is_empty() {
                    key.push('.');
                }
                key.push_str(&part.to_lowercase());
            }
        }
        key
    }

    /// Build a source from variables whose name starts with the prefix's variable form
    pub fn environment_source<I, K, V>(name: &str, prefix: &str, variables: I) -> PropertySource
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let env_prefix = Self::env_prefix(prefix);
        let mut source = PropertySource::new(name);
        for (variable, value) in variables {
            let variable = variable.as_ref();
            if variable.to_ascii_uppercase().starts_with(&env_prefix) {
                source.insert(Self::key_for_variable(variable), value);
            }
        }
        source
    }

    /// Source built from the process environment
    pub fn process_environment_source(prefix: &str) -> PropertySource {
        Self::environment_source("environment", prefix, std::env::vars())
    }

    /// Source built from a `.env` file without touching the process environment.
    /// Returns `None` when the file does not exist.
    pub fn env_file_source(path: &Path, prefix: &str) -> Result<Option<PropertySource>> {
        if !path.exists() {
            return Ok(None);
        }

        let iter = dotenv::from_path_iter(path)
            .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;
        let pairs = iter.collect::<std::result::Result<Vec<_>, _>>()?;

        let name = format!("dotenv:{}", path.display());
        Ok(Some(Self::environment_source(&name, prefix, pairs)))
    }

    /// Create example .env file content
    pub fn create_example_env_content(prefix: &str) -> String {
        let p = Self::env_prefix(prefix);
        format!(
            r#"# Property binder environment file
#
# Variables starting with {p} are bound onto the '{prefix}' record.
# Underscores separate path segments and numbers become list indices.
# Values here sit above the YAML/properties documents but below real
# environment variables and --set overrides.

# {p}LASTNAME=Zhang
# {p}AGE=18
# {p}ISOWNER=false
# {p}BIRTHDATE=2017/12/12
# {p}MAPS_K1=v1
# {p}LIST_0=first
# {p}LIST_1=second
# {p}PET_NAME=Tom
# {p}PET_BREED=Husky
"#
        )
    }

    /// Environment variable help, shown after the `--help` option list
    pub fn display_env_help(prefix: &str) -> String {
        let p = Self::env_prefix(prefix);
        let mut help = String::new();
        help.push_str("Environment Variables:\n\n");
        help.push_str(&format!("  {:<18} {}\n", format!("{}<FIELD>", p), "Binds a field (e.g. LASTNAME, AGE)"));
        help.push_str(&format!("  {:<18} {}\n", format!("{}<MAP>_<KEY>", p), "Adds a mapping entry"));
        help.push_str(&format!("  {:<18} {}\n\n", format!("{}<LIST>_<N>", p), "Sets a list element"));

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. --set overrides\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default document (application.yml)\n");
        help.push_str("  5. Named documents (--source)\n");

        help
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_env_prefix() {
        assert_eq!(EnvManager::env_prefix("person"), "PERSON_");
        assert_eq!(EnvManager::env_prefix("app.owner"), "APP_OWNER_");
        assert_eq!(EnvManager::env_prefix("my-app"), "MYAPP_");
    }

    #[test]
    fn test_key_for_variable() {
        assert_eq!(EnvManager::key_for_variable("PERSON_LASTNAME"), "person.lastname");
        assert_eq!(EnvManager::key_for_variable("PERSON_PET_NAME"), "person.pet.name");
        assert_eq!(EnvManager::key_for_variable("PERSON_LIST_0"), "person.list[0]");
        assert_eq!(EnvManager::key_for_variable("PERSON__AGE"), "person.age");
    }

    #[test]
    fn test_environment_source_filters_by_prefix() {
        let vars = vec![
            ("PERSON_AGE", "30"),
            ("PATH", "/usr/bin"),
            ("PERSONAL_TOKEN", "secret"),
            ("person_maps_k1", "v1"),
        ];
        let source = EnvManager::environment_source("environment", "person", vars);

        assert_eq!(source.len(), 2);
        assert_eq!(source.get("person.age"), Some("30"));
        assert_eq!(source.get("person.maps.k1"), Some("v1"));
    }

    #[test]
    fn test_env_file_source() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "PERSON_AGE=21\nOTHER=1\nPERSON_PET_NAME=Tom\n").unwrap();

        let source = EnvManager::env_file_source(&path, "person").unwrap().unwrap();
        assert_eq!(source.get("person.age"), Some("21"));
        assert_eq!(source.get("person.pet.name"), Some("Tom"));
        assert_eq!(source.len(), 2);

        assert!(EnvManager::env_file_source(&dir.path().join("none.env"), "person")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_example_env_content() {
        let content = EnvManager::create_example_env_content("person");
        assert!(content.contains("# PERSON_LASTNAME=Zhang"));
        assert!(content.contains("# PERSON_PET_NAME=Tom"));
    }

    #[test]
    fn test_display_env_help() {
        let help = EnvManager::display_env_help("person");
        assert!(help.contains("PERSON_<FIELD>"));
        assert!(help.contains("Configuration Priority"));
    }
}
