//! TOML configuration file loader.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::types::FileConfig;

/// Load a TOML configuration file.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Errors
///
/// * If the file cannot be read
/// * If the file cannot be parsed as TOML or contains unknown keys
pub fn load_toml_config(path: &Path) -> Result<FileConfig, ConfigError> {
    log::debug!("Loading TOML config from {}", path.display());

    let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: FileConfig = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    log::debug!("Loaded config: {config:?}");

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LogLevel;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_toml_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
source = "/data/src"
target = "backup"
delete-missing = true
update-method = "sha256"
log-level = "warning"
jobs = 4
atomic = true
"#
        )
        .unwrap();

        let config = load_toml_config(file.path()).unwrap();

        assert_eq!(config.source, Some(PathBuf::from("/data/src")));
        assert_eq!(config.target, Some(PathBuf::from("backup")));
        assert_eq!(config.delete_missing, Some(true));
        assert_eq!(config.update_method.as_deref(), Some("sha256"));
        assert_eq!(config.log_level, Some(LogLevel::Warn));
        assert_eq!(config.jobs, Some(4));
        assert_eq!(config.atomic, Some(true));
    }

    #[test]
    fn test_load_minimal_toml_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "delete-missing = false").unwrap();

        let config = load_toml_config(file.path()).unwrap();

        assert_eq!(config.delete_missing, Some(false));
        assert!(config.source.is_none());
        assert!(config.update_method.is_none());
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "delete_missing = true").unwrap();

        assert!(matches!(
            load_toml_config(file.path()),
            Err(ConfigError::TomlParseError { .. })
        ));
    }

    #[test]
    fn test_log_level_is_case_insensitive() {
        for (value, expected) in [("DEBUG", LogLevel::Debug), ("Warning", LogLevel::Warn)] {
            let mut file = NamedTempFile::new().unwrap();
            writeln!(file, r#"log-level = "{value}""#).unwrap();

            let config = load_toml_config(file.path()).unwrap();

            assert_eq!(config.log_level, Some(expected), "{value}");
        }
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"log-level = "loud""#).unwrap();

        assert!(matches!(
            load_toml_config(file.path()),
            Err(ConfigError::TomlParseError { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let path = Path::new("/nonexistent/treesync.toml");

        assert!(matches!(
            load_toml_config(path),
            Err(ConfigError::ReadError { .. })
        ));
    }
}
