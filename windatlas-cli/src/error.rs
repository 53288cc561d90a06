//! CLI error type.

use std::fmt;
use std::path::PathBuf;

use windatlas::boundary::BoundaryError;
use windatlas::catalog::CatalogError;
use windatlas::config::ConfigFileError;
use windatlas::merge::PlanError;
use windatlas::pipeline::PipelineError;
use windatlas::record::RecordIoError;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Invalid or inconsistent settings
    Config(String),
    ConfigFile(ConfigFileError),
    Logging(std::io::Error),
    Records(RecordIoError),
    Boundary(BoundaryError),
    Catalog(CatalogError),
    Plan(PlanError),
    Pipeline(PipelineError),
    /// Writing an output file failed
    Output {
        path: PathBuf,
        source: std::io::Error,
    },
    Serialize(serde_json::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "Config file error: {}", e),
            CliError::Logging(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Records(e) => write!(f, "{}", e),
            CliError::Boundary(e) => write!(f, "Boundary layer error: {}", e),
            CliError::Catalog(e) => write!(f, "Catalog error: {}", e),
            CliError::Plan(e) => write!(f, "Merge plan error: {}", e),
            CliError::Pipeline(e) => write!(f, "Pipeline error: {}", e),
            CliError::Output { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
            CliError::Serialize(e) => write!(f, "Failed to serialize output: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(_) => None,
            CliError::ConfigFile(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Records(e) => Some(e),
            CliError::Boundary(e) => Some(e),
            CliError::Catalog(e) => Some(e),
            CliError::Plan(e) => Some(e),
            CliError::Pipeline(e) => Some(e),
            CliError::Output { source, .. } => Some(source),
            CliError::Serialize(e) => Some(e),
        }
    }
}

impl CliError {
    /// Print the error with a hint and exit with status 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);
        if let Some(hint) = self.hint() {
            eprintln!();
            eprintln!("{}", hint);
        }
        std::process::exit(1);
    }

    fn hint(&self) -> Option<&'static str> {
        match self {
            CliError::Config(_) | CliError::ConfigFile(_) => Some(
                "Run 'windatlas config init' to create a commented config file, \
                 or pass --config <file>.",
            ),
            CliError::Pipeline(PipelineError::MissingCatalog) => {
                Some("Set 'path' in the [catalog] section of config.ini.")
            }
            CliError::Catalog(_) => Some(
                "The catalog must be a JSON array of entries with designation, \
                 rotor_diameter_m, hub_height_m and rated_power_kw.",
            ),
            CliError::Plan(_) => Some(
                "A plan is a JSON object with 'steps': [{left, right, output, policy}] \
                 and an optional 'result'.",
            ),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<RecordIoError> for CliError {
    fn from(e: RecordIoError) -> Self {
        CliError::Records(e)
    }
}

impl From<BoundaryError> for CliError {
    fn from(e: BoundaryError) -> Self {
        CliError::Boundary(e)
    }
}

impl From<CatalogError> for CliError {
    fn from(e: CatalogError) -> Self {
        CliError::Catalog(e)
    }
}

impl From<PlanError> for CliError {
    fn from(e: PlanError) -> Self {
        CliError::Plan(e)
    }
}

impl From<PipelineError> for CliError {
    fn from(e: PipelineError) -> Self {
        CliError::Pipeline(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialize(e)
    }
}
