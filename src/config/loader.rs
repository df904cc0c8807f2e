//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll
//! configurations from YAML files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, EngineResult};

use super::types::{PayrollConfig, PayrollSettings, RegimeStructures, StructuresConfig};

/// Loads and provides access to payroll configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── settings.yaml    # Caps, probation length, exemption component
/// ├── regimes.yaml     # Tax regime to salary structure mapping
/// └── structures.yaml  # Salary structure definitions (optional)
/// ```
///
/// # Example
///
/// ```no_run
/// use hr_payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("80C cap: {:?}", loader.config().caps().section_80c);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    source: Option<PathBuf>,
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - settings.yaml or regimes.yaml is missing
    /// - Any file contains invalid YAML
    /// - Any required field is missing from the configuration
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<PayrollSettings>(&path.join("settings.yaml"))?;
        let regimes = Self::load_yaml::<RegimeStructures>(&path.join("regimes.yaml"))?;

        // Structures are only needed by the comparison report.
        let structures_path = path.join("structures.yaml");
        let structures = if structures_path.exists() {
            Self::load_yaml::<StructuresConfig>(&structures_path)?
        } else {
            StructuresConfig::default()
        };

        Ok(Self {
            source: Some(path.to_path_buf()),
            config: PayrollConfig::new(settings, regimes, structures.structures),
        })
    }

    /// Wraps an already-built configuration that has no backing directory.
    pub fn from_config(config: PayrollConfig) -> Self {
        Self {
            source: None,
            config,
        }
    }

    /// Re-reads the configuration from the directory it was loaded from.
    ///
    /// A loader built with [`ConfigLoader::from_config`] returns a copy of itself.
    pub fn reload(&self) -> EngineResult<Self> {
        match &self.source {
            Some(path) => Self::load(path),
            None => Ok(self.clone()),
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the directory the configuration was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Returns the underlying payroll configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> PayrollConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn config_path() -> &'static str {
        "./config/default"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        let caps = loader.config().caps();
        assert_eq!(caps.section_80c, Some(Decimal::new(150_000, 0)));
        assert_eq!(caps.section_80d, Some(Decimal::new(50_000, 0)));
        assert!(caps.enforce);
        assert_eq!(loader.config().settings().default_probation_days, 90);
    }

    #[test]
    fn test_regimes_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let regimes = loader.config().regimes();
        assert_eq!(regimes.old_regime, "DEMO - Salary Structure - Old Regime");
        assert_eq!(regimes.new_regime, "DEMO - Salary Structure - New Regime");
    }

    #[test]
    fn test_structures_loaded_for_both_regimes() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let config = loader.config();
        for name in config.regimes().allowed() {
            let structure = config.structures().get(&name);
            assert!(structure.is_some(), "missing structure {}", name);
            assert!(!structure.unwrap().deductions.is_empty());
        }
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("settings.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_reload_reads_same_directory() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let reloaded = loader.reload().unwrap();
        assert_eq!(reloaded.source(), loader.source());
        assert_eq!(
            reloaded.config().settings(),
            loader.config().settings()
        );
    }

    #[test]
    fn test_reload_without_source_returns_copy() {
        let loader = ConfigLoader::from_config(PayrollConfig::default());
        let reloaded = loader.reload().unwrap();
        assert!(reloaded.source().is_none());
        assert_eq!(reloaded.config().regimes(), loader.config().regimes());
    }
}
