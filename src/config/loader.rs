//! Rate configuration loading.
//!
//! This module provides the [`RateConfigLoader`] type for loading
//! effective-dated rate tables from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::provider::InMemoryRateProvider;
use super::types::RateTable;

/// Loads rate tables from a configuration directory.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/pl/
/// └── rates/
///     ├── 2024-01-01.yaml  # Table effective from this date
///     └── 2025-01-01.yaml
/// ```
///
/// Each file holds one [`RateTable`]; the file name is conventionally the
/// `effective_from` date but only the field inside the file is authoritative.
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::{RateConfigLoader, RateProvider};
///
/// let provider = RateConfigLoader::load("./config/pl").unwrap();
/// let table = provider.resolve(2024, 3).unwrap();
/// println!("Annual ceiling: {}", table.annual_ceiling);
/// ```
#[derive(Debug)]
pub struct RateConfigLoader;

impl RateConfigLoader {
    /// Loads all rate tables from `<path>/rates/*.yaml` and builds a
    /// provider from them.
    ///
    /// # Returns
    ///
    /// Returns an [`InMemoryRateProvider`] on success, or an error if:
    /// - The rates directory is missing or contains no YAML files
    /// - Any file contains invalid YAML
    /// - The loaded tables overlap
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<InMemoryRateProvider> {
        let rates_dir = path.as_ref().join("rates");
        let rates_dir_str = rates_dir.display().to_string();

        if !rates_dir.exists() {
            return Err(EngineError::ConfigNotFound {
                path: rates_dir_str,
            });
        }

        let entries = fs::read_dir(&rates_dir).map_err(|_| EngineError::ConfigNotFound {
            path: rates_dir_str.clone(),
        })?;

        let mut tables = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: rates_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                tables.push(Self::load_yaml(&path)?);
            }
        }

        if tables.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no rate files found)", rates_dir_str),
            });
        }

        InMemoryRateProvider::new(tables)
    }

    /// Loads and parses a single rate-table YAML file.
    fn load_yaml(path: &Path) -> EngineResult<RateTable> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }
}
