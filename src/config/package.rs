//! Locating installed ROS 2 packages.

use super::ConfigLoadError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable listing install prefixes, `:`-separated.
pub const AMENT_PREFIX_PATH: &str = "AMENT_PREFIX_PATH";

const RESOURCE_INDEX: &str = "share/ament_index/resource_index/packages";

/// Finds a package's share directory across ament install prefixes.
///
/// A prefix provides a package when it carries the marker file
/// `share/ament_index/resource_index/packages/<package>`. Prefixes are searched
/// in order and the first match wins.
#[derive(Debug, Clone, Default)]
pub struct PackageResolver {
    prefixes: Vec<PathBuf>,
}

impl PackageResolver {
    pub fn new(prefixes: Vec<PathBuf>) -> Self {
        Self { prefixes }
    }

    /// Builds a resolver from `AMENT_PREFIX_PATH`. An unset variable yields a
    /// resolver that finds nothing.
    pub fn from_env() -> Self {
        let prefixes: Vec<PathBuf> = std::env::var_os(AMENT_PREFIX_PATH)
            .map(|value| std::env::split_paths(&value).filter(|p| !p.as_os_str().is_empty()).collect())
            .unwrap_or_default();
        Self::new(prefixes)
    }

    pub fn share_directory(&self, package: &str) -> Result<PathBuf, ConfigLoadError> {
        self.prefixes
            .iter()
            .find(|prefix| provides(prefix, package))
            .map(|prefix| {
                let share = prefix.join("share").join(package);
                debug!(package, share = %share.display(), "Resolved package");
                share
            })
            .ok_or_else(|| ConfigLoadError::PackageNotFound(package.to_string()))
    }
}

fn provides(prefix: &Path, package: &str) -> bool {
    prefix.join(RESOURCE_INDEX).join(package).is_file()
}
