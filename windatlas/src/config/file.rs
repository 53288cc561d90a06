//! Configuration file handling for `~/.windatlas/config.ini`.

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use super::settings::ConfigFile;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Parse configuration from INI text.
    pub fn from_ini_str(text: &str) -> Result<Self, ConfigFileError> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigFileError::ReadError(ini::Error::Parse(e)))?;
        super::parser::parse_ini(&ini)
    }

    /// Render as commented INI text.
    pub fn to_ini_string(&self) -> String {
        super::writer::to_config_string(self)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }
        std::fs::write(path, self.to_ini_string())
            .map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Write a default config file if none exists. Returns its path.
    pub fn ensure_exists(path: &Path) -> Result<PathBuf, ConfigFileError> {
        if !path.exists() {
            Self::default().save_to(path)?;
        }
        Ok(path.to_path_buf())
    }
}

/// The config directory (`~/.windatlas`).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".windatlas")
}

/// The config file (`~/.windatlas/config.ini`).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
