//! Executing launch plans.
//!
//! A [`ProcessSupervisor`] receives a finished [`LaunchPlan`] and decides how to
//! run it. The orchestrator never calls into this module, which keeps plan
//! construction testable without starting anything.
//!
//! - [`LocalSupervisor`] spawns real child processes.
//! - [`DryRunSupervisor`] prints the command lines it would run.
//! - [`mock::MockSupervisor`] records plans for tests.

pub mod command;
pub mod dry_run;
pub mod error;
pub mod local;
pub mod mock;

pub use command::*;
pub use dry_run::*;
pub use error::*;
pub use local::*;

use crate::model::LaunchPlan;
use async_trait::async_trait;

/// How one process ended. `code` is `None` when it was killed by a signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessExit {
    pub label: String,
    pub code: Option<i32>,
}

impl ProcessExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Outcome of executing a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchReport {
    /// One entry per process that finished, in plan order.
    pub exits: Vec<ProcessExit>,
    /// Whether execution stopped on an interrupt rather than on its own.
    pub interrupted: bool,
}

impl LaunchReport {
    pub fn success(&self) -> bool {
        self.exits.iter().all(ProcessExit::success)
    }
}

/// Runs a launch plan to completion.
#[async_trait]
pub trait ProcessSupervisor: Send + Sync {
    async fn execute(&self, plan: LaunchPlan) -> Result<LaunchReport, SupervisorError>;
}
