//! Shared command setup: configuration and logging.

use std::path::PathBuf;

use tracing::info;
use windatlas::config::ConfigFile;
use windatlas::logging::{default_log_file, init_logging, LoggingGuard};

use crate::error::CliError;

/// Flags available on every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    pub config: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

impl GlobalArgs {
    /// Load the configuration named by `--config`, else the default file.
    pub fn load_config(&self) -> Result<ConfigFile, CliError> {
        match &self.config {
            Some(path) if !path.exists() => Err(CliError::Config(format!(
                "Config file not found: {}",
                path.display()
            ))),
            Some(path) => Ok(ConfigFile::load_from(path)?),
            None => Ok(ConfigFile::load()?),
        }
    }
}

/// Loaded configuration plus the live logging guard.
pub struct CliRunner {
    config: ConfigFile,
    _logging: LoggingGuard,
}

impl CliRunner {
    pub fn new(global: &GlobalArgs) -> Result<Self, CliError> {
        let config = global.load_config()?;

        // CLI > config
        let log_dir = global
            .log_dir
            .clone()
            .or_else(|| config.logging.directory.clone());
        let log_file = config
            .logging
            .file
            .clone()
            .unwrap_or_else(|| default_log_file().to_string());
        let logging = init_logging(log_dir.as_deref(), &log_file).map_err(CliError::Logging)?;

        Ok(Self {
            config,
            _logging: logging,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn log_startup(&self, command: &str) {
        info!(
            command,
            version = env!("CARGO_PKG_VERSION"),
            "Windatlas starting"
        );
    }
}
