//! Configuration management CLI commands.
//!
//! Provides `config path`, `config init` and `config show`.

use clap::Subcommand;
use windatlas::config::{config_file_path, ConfigFile};

use crate::error::CliError;
use crate::runner::GlobalArgs;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Write a commented configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration as INI
    Show,
}

/// Run a config subcommand.
pub fn run(global: &GlobalArgs, command: ConfigCommands) -> Result<(), CliError> {
    let path = global.config.clone().unwrap_or_else(config_file_path);
    match command {
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                println!("Configuration file already exists: {}", path.display());
                println!("Use --force to overwrite it with defaults.");
                return Ok(());
            }
            ConfigFile::default().save_to(&path)?;
            println!("Configuration file: {}", path.display());
            println!();
            println!("Edit this file to set boundary layers, the catalog and region defaults.");
            println!("CLI arguments override config file values when specified.");
            Ok(())
        }
        ConfigCommands::Show => {
            let config = global.load_config()?;
            print!("{}", config.to_ini_string());
            Ok(())
        }
    }
}
