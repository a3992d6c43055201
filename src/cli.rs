//! Command-line interface of the `awsim-launch` binary.

use crate::config::{Assignment, ConfigLoadError, LaunchArgs, PackageResolver, AWSIM_PATH, LANELET2_MAP_PATH};
use crate::orchestrator::{ParameterSources, DEFAULT_NAMESPACE};
use crate::supervisor::DEFAULT_ROS2_BIN;
use clap::Parser;
use std::path::PathBuf;

/// Start AWSIM together with the map loader, map projection and prediction nodes.
#[derive(Debug, Parser)]
#[command(name = "awsim-launch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Launch arguments as `name:=value`, e.g. `lanelet2_map_path:=/maps/town.osm`.
    #[arg(value_name = "NAME:=VALUE")]
    pub assignments: Vec<Assignment>,

    /// Path to the lanelet2 map. Overrides `lanelet2_map_path:=`.
    #[arg(long)]
    pub lanelet2_map_path: Option<String>,

    /// Command line that starts AWSIM. Overrides `AWSIM_path:=`.
    #[arg(long)]
    pub awsim_path: Option<String>,

    /// Directory holding all three parameter files.
    #[arg(long)]
    pub params_dir: Option<PathBuf>,

    /// Parameter file for the prediction node.
    #[arg(long)]
    pub prediction_params: Option<PathBuf>,

    /// Parameter file for the lanelet2 map loader.
    #[arg(long)]
    pub map_loader_params: Option<PathBuf>,

    /// Parameter file for the map projection loader.
    #[arg(long)]
    pub map_projection_params: Option<PathBuf>,

    /// Directory for the output logs of the nodes. Defaults to
    /// `$ROS_LOG_DIR`, `$ROS_HOME/log` or `~/.ros/log`, plus a per-run directory.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Namespace the nodes run in.
    #[arg(long, default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Program used to start ROS 2 nodes.
    #[arg(long, default_value = DEFAULT_ROS2_BIN)]
    pub ros2_bin: String,

    /// Print the commands instead of running them.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the launch plan as YAML and exit.
    #[arg(long, conflicts_with = "dry_run")]
    pub print_plan: bool,

    /// List the declared launch arguments and exit.
    #[arg(long)]
    pub show_args: bool,
}

impl Cli {
    /// Launch arguments from positional assignments, then named flags.
    pub fn launch_args(&self) -> LaunchArgs {
        let mut args = LaunchArgs::new();
        for assignment in &self.assignments {
            args.set(assignment.name.clone(), assignment.value.clone());
        }
        if let Some(path) = &self.lanelet2_map_path {
            args.set(LANELET2_MAP_PATH, path.clone());
        }
        if let Some(cmd) = &self.awsim_path {
            args.set(AWSIM_PATH, cmd.clone());
        }
        args
    }

    /// Parameter file per node: explicit flag, then `--params-dir`, then the
    /// package's installed share directory. Packages are only resolved when a
    /// flag is missing and no `--params-dir` is given.
    pub fn parameter_sources(&self, resolver: &PackageResolver) -> Result<ParameterSources, ConfigLoadError> {
        if let (Some(prediction), Some(map_loader), Some(map_projection)) =
            (&self.prediction_params, &self.map_loader_params, &self.map_projection_params)
        {
            return Ok(ParameterSources::new(prediction, map_loader, map_projection));
        }

        let mut sources = match &self.params_dir {
            Some(dir) => ParameterSources::in_directory(dir),
            None => ParameterSources::from_packages(resolver)?,
        };
        if let Some(path) = &self.prediction_params {
            sources.prediction = path.clone();
        }
        if let Some(path) = &self.map_loader_params {
            sources.map_loader = path.clone();
        }
        if let Some(path) = &self.map_projection_params {
            sources.map_projection = path.clone();
        }
        Ok(sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignments_and_flags() {
        let cli = Cli::parse_from([
            "awsim-launch",
            "lanelet2_map_path:=/maps/a.osm",
            "AWSIM_path:=/opt/awsim/run.sh",
            "--lanelet2-map-path",
            "/maps/b.osm",
        ]);
        let args = cli.launch_args();
        assert_eq!(args.get(LANELET2_MAP_PATH), Some("/maps/b.osm"));
        assert_eq!(args.get(AWSIM_PATH), Some("/opt/awsim/run.sh"));
        assert_eq!(cli.namespace, "AWSIM");
        assert_eq!(cli.ros2_bin, "ros2");
    }

    #[test]
    fn test_malformed_assignment_is_rejected() {
        assert!(Cli::try_parse_from(["awsim-launch", "lanelet2_map_path=/maps/a.osm"]).is_err());
    }

    #[test]
    fn test_params_dir_and_explicit_override() {
        let cli = Cli::parse_from([
            "awsim-launch",
            "--params-dir",
            "/etc/awsim",
            "--map-loader-params",
            "/tmp/loader.yaml",
        ]);
        let sources = cli.parameter_sources(&PackageResolver::default()).unwrap();
        assert_eq!(sources.prediction, PathBuf::from("/etc/awsim/map_based_prediction.param.yaml"));
        assert_eq!(sources.map_loader, PathBuf::from("/tmp/loader.yaml"));
        assert_eq!(sources.map_projection, PathBuf::from("/etc/awsim/map_projection_loader.param.yaml"));
    }

    #[test]
    fn test_explicit_files_skip_package_lookup() {
        let cli = Cli::parse_from([
            "awsim-launch",
            "--prediction-params",
            "/tmp/p.yaml",
            "--map-loader-params",
            "/tmp/l.yaml",
            "--map-projection-params",
            "/tmp/m.yaml",
        ]);
        let sources = cli.parameter_sources(&PackageResolver::default()).unwrap();
        assert_eq!(sources, ParameterSources::new("/tmp/p.yaml", "/tmp/l.yaml", "/tmp/m.yaml"));
    }

    #[test]
    fn test_log_dir() {
        let cli = Cli::parse_from(["awsim-launch", "--log-dir", "/var/log/awsim"]);
        assert_eq!(cli.log_dir, Some(PathBuf::from("/var/log/awsim")));
        assert_eq!(Cli::parse_from(["awsim-launch"]).log_dir, None);
    }

    #[test]
    fn test_unresolvable_package() {
        let cli = Cli::parse_from(["awsim-launch"]);
        let err = cli.parameter_sources(&PackageResolver::default()).unwrap_err();
        assert!(matches!(err, ConfigLoadError::PackageNotFound(_)));
    }

    #[test]
    fn test_print_plan_conflicts_with_dry_run() {
        assert!(Cli::try_parse_from(["awsim-launch", "--dry-run", "--print-plan"]).is_err());
    }
}
