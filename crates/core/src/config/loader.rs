//! Configuration file loading

use super::schema::ClearwayConfig;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    /// Parsed settings
    pub schema: ClearwayConfig,
    /// File the settings came from, if any
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    ///
    /// An explicit path must exist. Without one, the standard locations are
    /// searched and defaults are used when none is present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) if !p.exists() => {
                return Err(Error::new(
                    crate::ErrorCode::ConfigNotFound,
                    format!("Configuration file not found: {}", p.display()),
                )
                .with_suggestion("Create a clearway.toml file or omit --config"));
            }
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(),
        };

        let schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ClearwayConfig::default()
        };
        schema.validate()?;

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Defaults only, no file
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            schema: ClearwayConfig::default(),
            path: None,
        }
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    let mut candidates = vec![
        PathBuf::from(".clearway.toml"),
        PathBuf::from("clearway.toml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("clearway").join("config.toml"));
    }

    candidates.into_iter().find(|candidate| candidate.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ClearwayConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!("Failed to read config file {}: {e}", path.display()))
    })?;

    toml::from_str(&content).map_err(|e| {
        Error::new(
            crate::ErrorCode::ConfigParseError,
            format!("Failed to parse config file {}: {e}", path.display()),
        )
    })
}
