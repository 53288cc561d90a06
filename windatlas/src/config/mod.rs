//! User configuration (`~/.windatlas/config.ini`).
//!
//! Settings structs live in [`settings`], constants in [`defaults`],
//! parsing in `parser` and serialization in `writer`. A missing file means
//! defaults everywhere.

pub mod defaults;
mod file;
mod parser;
pub mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    BoundarySettings, CatalogSettings, ConfigFile, DedupeSettings, LoggingSettings,
    MatcherSettings, MergeSettings,
};
