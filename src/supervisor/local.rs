use super::{CommandLine, LaunchReport, ProcessSupervisor, SupervisorError, DEFAULT_ROS2_BIN};
use crate::model::LaunchPlan;
use crate::runtime::{default_log_dir, shutdown_signal, LaunchSystem};
use async_trait::async_trait;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Starts every entry of a plan as a child process of this one.
///
/// Entries start in plan order. Execution ends when every child has exited, or
/// on Ctrl-C / SIGTERM, in which case all children still running are stopped.
#[derive(Debug, Clone)]
pub struct LocalSupervisor {
    ros2_bin: String,
    log_dir: PathBuf,
}

impl LocalSupervisor {
    pub fn new(ros2_bin: impl Into<String>) -> Self {
        Self {
            ros2_bin: ros2_bin.into(),
            log_dir: default_log_dir(),
        }
    }

    /// Directory receiving one `<label>.log` per `Log`/`Both` process.
    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = log_dir.into();
        self
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Runs `plan` until every child exits or `shutdown` resolves.
    pub async fn execute_until<F>(&self, plan: LaunchPlan, shutdown: F) -> Result<LaunchReport, SupervisorError>
    where
        F: Future<Output = ()> + Send,
    {
        let commands: Vec<CommandLine> = plan
            .into_iter()
            .map(|entry| CommandLine::for_entry(&entry, &self.ros2_bin))
            .collect();

        let mut system = LaunchSystem::start(commands, &self.log_dir)?;

        let finished = tokio::select! {
            result = system.wait_all() => Some(result),
            _ = shutdown => None,
        };

        match finished {
            Some(result) => {
                let exits = result?;
                info!(processes = exits.len(), "All processes exited");
                Ok(LaunchReport {
                    exits,
                    interrupted: false,
                })
            }
            None => {
                warn!("Interrupted, stopping processes");
                let exits = system.shutdown().await?;
                Ok(LaunchReport {
                    exits,
                    interrupted: true,
                })
            }
        }
    }
}

impl Default for LocalSupervisor {
    fn default() -> Self {
        Self::new(DEFAULT_ROS2_BIN)
    }
}

#[async_trait]
impl ProcessSupervisor for LocalSupervisor {
    async fn execute(&self, plan: LaunchPlan) -> Result<LaunchReport, SupervisorError> {
        self.execute_until(plan, shutdown_signal()).await
    }
}
