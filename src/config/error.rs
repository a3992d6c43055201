//! Error types for configuration loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a launch plan from being built.
///
/// Every variant is fatal: when one is returned no part of the plan exists.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// The parameter file does not exist.
    #[error("Parameter file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The parameter file exists but could not be read.
    #[error("Failed to read parameter file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The parameter file is not valid YAML.
    #[error("Failed to parse parameter file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A key on the way to the parameter block is absent.
    #[error("Parameter file {} has no `{key}` section", path.display())]
    MissingSection { path: PathBuf, key: String },

    /// A section exists but does not hold a mapping.
    #[error("Section `{key}` in {} is not a mapping", path.display())]
    NotAMapping { path: PathBuf, key: String },

    /// A parameter name is not a string.
    #[error("Parameter name {name} in {} is not a string", path.display())]
    InvalidParameterName { path: PathBuf, name: String },

    /// No ament prefix provides the package.
    #[error("Package not found in AMENT_PREFIX_PATH: {0}")]
    PackageNotFound(String),
}
