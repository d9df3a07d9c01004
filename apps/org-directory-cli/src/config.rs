//! Layered CLI configuration: defaults, then YAML file, then environment.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use org_directory::OrgDirectoryConfig;
use serde::{Deserialize, Serialize};

/// Prefix for environment overrides, e.g. `ORG_DIRECTORY__DIRECTORY__MAX_LOOKUPS=20`.
pub const ENV_PREFIX: &str = "ORG_DIRECTORY__";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Directory snapshot to load.
    pub snapshot: Option<PathBuf>,
    pub logging: LoggingConfig,
    pub directory: OrgDirectoryConfig,
}

impl AppConfig {
    /// Merge defaults, the optional YAML file and `ORG_DIRECTORY__*` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or any layer fails to deserialize.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.is_file() {
                anyhow::bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        let config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.directory, OrgDirectoryConfig::default());
        assert!(config.snapshot.is_none());
    }

    #[test]
    fn test_yaml_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "snapshot: /tmp/org.yaml\nlogging:\n  level: debug\ndirectory:\n  max_lookups: 5\n"
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.snapshot, Some(PathBuf::from("/tmp/org.yaml")));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.directory.max_lookups, 5);
        assert_eq!(config.directory.max_page_size, 1000);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(AppConfig::load(Some(Path::new("/nonexistent/org-directory.yaml"))).is_err());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "directory:\n  lookup_limit: 5\n").unwrap();
        assert!(AppConfig::load(Some(file.path())).is_err());
    }
}
