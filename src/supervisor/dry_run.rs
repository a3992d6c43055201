use super::{CommandLine, LaunchReport, ProcessSupervisor, SupervisorError, DEFAULT_ROS2_BIN};
use crate::model::LaunchPlan;
use async_trait::async_trait;
use tracing::info;

/// Prints what would be started and starts nothing.
#[derive(Debug, Clone)]
pub struct DryRunSupervisor {
    ros2_bin: String,
}

impl DryRunSupervisor {
    pub fn new(ros2_bin: impl Into<String>) -> Self {
        Self {
            ros2_bin: ros2_bin.into(),
        }
    }

    pub fn render(&self, plan: &LaunchPlan) -> Vec<CommandLine> {
        plan.entries()
            .iter()
            .map(|entry| CommandLine::for_entry(entry, &self.ros2_bin))
            .collect()
    }
}

impl Default for DryRunSupervisor {
    fn default() -> Self {
        Self::new(DEFAULT_ROS2_BIN)
    }
}

#[async_trait]
impl ProcessSupervisor for DryRunSupervisor {
    async fn execute(&self, plan: LaunchPlan) -> Result<LaunchReport, SupervisorError> {
        for line in self.render(&plan) {
            info!(process = %line.label, "Would start");
            println!("{}", line);
        }
        Ok(LaunchReport::default())
    }
}
