//! Reading parameter files.
//!
//! [`ConfigLoader`] is the seam between the orchestrator and the outside world:
//! the orchestrator only ever sees parsed YAML values, so tests can hand it
//! documents without touching the filesystem.

use super::ConfigLoadError;
use crate::model::{ParameterDocument, ParameterSet};
use serde_yaml::Value;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Top-level key scoping the parameters to every node.
pub const PARAMETER_SCOPE_KEY: &str = "/**";

/// Key holding the parameter mapping inside the scope.
pub const PARAMETER_BLOCK_KEY: &str = "ros__parameters";

/// Something that can produce a parsed YAML document for a path.
pub trait ConfigLoader: Send + Sync {
    fn read_document(&self, path: &Path) -> Result<Value, ConfigLoadError>;
}

impl<L: ConfigLoader + ?Sized> ConfigLoader for &L {
    fn read_document(&self, path: &Path) -> Result<Value, ConfigLoadError> {
        (**self).read_document(path)
    }
}

/// Loads parameter files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsConfigLoader;

impl ConfigLoader for FsConfigLoader {
    fn read_document(&self, path: &Path) -> Result<Value, ConfigLoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => ConfigLoadError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ConfigLoadError::Read {
                path: path.to_path_buf(),
                source,
            },
        })?;
        debug!(path = %path.display(), bytes = text.len(), "Read parameter file");
        parse_document(path, &text)
    }
}

/// Serves documents from memory. Paths not registered behave like missing files.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigLoader {
    documents: HashMap<PathBuf, String>,
}

impl MemoryConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers YAML text under `path`.
    pub fn with_document(mut self, path: impl Into<PathBuf>, yaml: impl Into<String>) -> Self {
        self.documents.insert(path.into(), yaml.into());
        self
    }
}

impl ConfigLoader for MemoryConfigLoader {
    fn read_document(&self, path: &Path) -> Result<Value, ConfigLoadError> {
        let text = self.documents.get(path).ok_or_else(|| ConfigLoadError::NotFound {
            path: path.to_path_buf(),
        })?;
        parse_document(path, text)
    }
}

fn parse_document(path: &Path, text: &str) -> Result<Value, ConfigLoadError> {
    serde_yaml::from_str(text).map_err(|source| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Pulls the `/**` -> `ros__parameters` block out of a parsed document.
pub fn extract_parameters(path: &Path, document: &Value) -> Result<ParameterDocument, ConfigLoadError> {
    let scope = section(path, document, PARAMETER_SCOPE_KEY)?;
    let block = section(path, scope, PARAMETER_BLOCK_KEY)?;
    let mapping = block.as_mapping().ok_or_else(|| ConfigLoadError::NotAMapping {
        path: path.to_path_buf(),
        key: PARAMETER_BLOCK_KEY.to_string(),
    })?;

    let mut parameters = ParameterSet::new();
    for (name, value) in mapping {
        let name = name.as_str().ok_or_else(|| ConfigLoadError::InvalidParameterName {
            path: path.to_path_buf(),
            name: format!("{:?}", name),
        })?;
        parameters.insert(name, value.clone());
    }
    Ok(ParameterDocument::new(path, parameters))
}

fn section<'a>(path: &Path, value: &'a Value, key: &str) -> Result<&'a Value, ConfigLoadError> {
    let mapping = value.as_mapping().ok_or_else(|| ConfigLoadError::MissingSection {
        path: path.to_path_buf(),
        key: key.to_string(),
    })?;
    mapping.get(key).ok_or_else(|| ConfigLoadError::MissingSection {
        path: path.to_path_buf(),
        key: key.to_string(),
    })
}
