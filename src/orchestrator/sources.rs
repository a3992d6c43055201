use super::nodes::{NodeDescriptor, NODES};
use crate::config::{ConfigLoadError, PackageResolver};
use std::path::{Path, PathBuf};

/// Where each node's parameter file lives, one path per entry of [`NODES`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSources {
    pub prediction: PathBuf,
    pub map_loader: PathBuf,
    pub map_projection: PathBuf,
}

impl ParameterSources {
    pub fn new(
        prediction: impl Into<PathBuf>,
        map_loader: impl Into<PathBuf>,
        map_projection: impl Into<PathBuf>,
    ) -> Self {
        Self {
            prediction: prediction.into(),
            map_loader: map_loader.into(),
            map_projection: map_projection.into(),
        }
    }

    /// Every parameter file under one directory, using the file names the
    /// packages install.
    pub fn in_directory(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let [prediction, map_loader, map_projection] = NODES.map(|node| dir.join(node.params_file_name()));
        Self::new(prediction, map_loader, map_projection)
    }

    /// Parameter files as installed in each package's share directory.
    pub fn from_packages(resolver: &PackageResolver) -> Result<Self, ConfigLoadError> {
        let installed = |node: NodeDescriptor| -> Result<PathBuf, ConfigLoadError> {
            Ok(resolver.share_directory(node.package)?.join(node.params_file))
        };
        let [prediction, map_loader, map_projection] = NODES.map(installed);
        Ok(Self::new(prediction?, map_loader?, map_projection?))
    }

    /// Paths in [`NODES`] order.
    pub fn paths(&self) -> [&Path; 3] {
        [&self.prediction, &self.map_loader, &self.map_projection]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::{MAP_LOADER, PREDICTION};

    #[test]
    fn test_from_packages_uses_installed_param_files() {
        let prefix = tempfile::tempdir().unwrap();
        let index = prefix.path().join("share/ament_index/resource_index/packages");
        std::fs::create_dir_all(&index).unwrap();
        for node in NODES {
            std::fs::write(index.join(node.package), "").unwrap();
        }

        let resolver = PackageResolver::new(vec![prefix.path().into()]);
        let sources = ParameterSources::from_packages(&resolver).unwrap();

        assert_eq!(
            sources.map_loader,
            prefix.path().join("share/awsim_map_loader/config/lanelet2_map_loader.param.yaml")
        );
        assert_eq!(
            sources.prediction,
            prefix
                .path()
                .join("share/awsim_map_based_prediction/config/map_based_prediction.param.yaml")
        );
    }

    #[test]
    fn test_from_packages_fails_on_missing_package() {
        let resolver = PackageResolver::new(vec![]);
        assert!(matches!(
            ParameterSources::from_packages(&resolver),
            Err(ConfigLoadError::PackageNotFound(_))
        ));
    }

    #[test]
    fn test_in_directory() {
        let sources = ParameterSources::in_directory("/etc/awsim");
        assert_eq!(sources.map_projection, Path::new("/etc/awsim/map_projection_loader.param.yaml"));
    }

    #[test]
    fn test_paths_follow_node_order() {
        let sources = ParameterSources::in_directory("/etc/awsim");
        for (node, path) in NODES.iter().zip(sources.paths()) {
            assert_eq!(path.file_name().unwrap(), node.params_file_name());
        }
        assert_eq!(sources.paths()[0], sources.prediction.as_path());
    }
}
