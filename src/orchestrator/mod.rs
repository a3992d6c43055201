//! Turns parameter files and launch arguments into a [`LaunchPlan`].
//!
//! The [`Orchestrator`] is a pure builder. It reads documents through the
//! injected [`ConfigLoader`], never spawns anything, and either returns a
//! complete plan or an error. There is no partially built plan: every
//! parameter file is loaded before the first [`WorkerSpec`] is assembled.

pub mod nodes;
pub mod sources;

pub use nodes::*;
pub use sources::*;

use crate::config::{extract_parameters, ConfigLoadError, ConfigLoader, LaunchArgs, AWSIM_PATH, LANELET2_MAP_PATH};
use crate::model::{
    merge_params, LaunchEntry, LaunchPlan, OutputMode, ParameterDocument, ParameterSet, RemappingRule,
    ShellCommand, WorkerSpec,
};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Builds launch plans for the simulator and its companion nodes.
pub struct Orchestrator<L: ConfigLoader> {
    loader: L,
    sources: ParameterSources,
    namespace: String,
}

impl<L: ConfigLoader> Orchestrator<L> {
    pub fn new(loader: L, sources: ParameterSources) -> Self {
        Self {
            loader,
            sources,
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }

    /// Runs every node under `namespace` instead of [`DEFAULT_NAMESPACE`].
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn sources(&self) -> &ParameterSources {
        &self.sources
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Reads `path` and returns its `ros__parameters` block.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load_parameter_document(&self, path: &Path) -> Result<ParameterDocument, ConfigLoadError> {
        let document = self.loader.read_document(path)?;
        let params = extract_parameters(path, &document)?;
        debug!(count = params.parameters().len(), "Loaded parameters");
        Ok(params)
    }

    /// Builds the full plan: prediction, map loader, map projection, then the
    /// simulator command.
    #[instrument(skip_all, fields(namespace = %self.namespace))]
    pub fn build_plan(&self, args: &LaunchArgs) -> Result<LaunchPlan, ConfigLoadError> {
        // Load everything up front so a bad file leaves nothing behind.
        let documents = NODES
            .iter()
            .zip(self.sources.paths())
            .map(|(node, path)| -> Result<_, ConfigLoadError> { Ok((node, self.load_parameter_document(path)?)) })
            .collect::<Result<Vec<_>, _>>()?;

        let map_path = args.resolve(LANELET2_MAP_PATH);
        let mut entries: Vec<LaunchEntry> = documents
            .iter()
            .map(|(node, document)| {
                let mut extra = ParameterSet::new();
                if node.takes_map_path {
                    extra.insert(LANELET2_MAP_PATH, map_path.as_str());
                }
                let remappings = node.remappings.iter().map(|&pair| RemappingRule::from(pair)).collect();
                LaunchEntry::Worker(build_worker(
                    node.name,
                    node.package,
                    node.executable,
                    &self.namespace,
                    document,
                    &extra,
                    remappings,
                ))
            })
            .collect();

        let simulator = ShellCommand::shell(args.resolve(AWSIM_PATH));
        entries.push(LaunchEntry::Process(simulator));

        let plan = LaunchPlan::new(entries);
        info!(entries = plan.len(), "Launch plan ready");
        Ok(plan)
    }
}

/// Assembles one worker.
///
/// `extra_params` are merged over the document's parameters with
/// [`merge_params`], so on a name collision the extra value wins. Remappings
/// are kept in the given order and are not checked; a bad topic name only
/// shows up once the node starts.
pub fn build_worker(
    name: &str,
    package: &str,
    executable: &str,
    namespace: &str,
    param_doc: &ParameterDocument,
    extra_params: &ParameterSet,
    remappings: Vec<RemappingRule>,
) -> WorkerSpec {
    WorkerSpec {
        package: package.to_string(),
        executable: executable.to_string(),
        name: name.to_string(),
        namespace: namespace.to_string(),
        output: OutputMode::Both,
        parameters: merge_params(param_doc.parameters(), extra_params),
        remappings,
    }
}
