use super::WorkerSpec;
use serde::Serialize;

/// A bare command the supervisor runs as-is, outside ROS node management.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShellCommand {
    pub command: String,
    /// Run through `sh -c` instead of splitting into program and arguments.
    pub shell: bool,
}

impl ShellCommand {
    pub fn shell(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            shell: true,
        }
    }
}

/// One thing to start.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LaunchEntry {
    Worker(WorkerSpec),
    Process(ShellCommand),
}

impl LaunchEntry {
    pub fn as_worker(&self) -> Option<&WorkerSpec> {
        match self {
            LaunchEntry::Worker(worker) => Some(worker),
            LaunchEntry::Process(_) => None,
        }
    }

    pub fn as_process(&self) -> Option<&ShellCommand> {
        match self {
            LaunchEntry::Process(cmd) => Some(cmd),
            LaunchEntry::Worker(_) => None,
        }
    }
}

/// Everything to start, in start order.
///
/// A plan has no mutators. Supervisors take it by value, so each plan is
/// executed at most once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchPlan {
    entries: Vec<LaunchEntry>,
}

impl LaunchPlan {
    pub fn new(entries: Vec<LaunchEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[LaunchEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn workers(&self) -> impl Iterator<Item = &WorkerSpec> {
        self.entries.iter().filter_map(LaunchEntry::as_worker)
    }

    /// Finds a worker by node name.
    pub fn worker(&self, name: &str) -> Option<&WorkerSpec> {
        self.workers().find(|w| w.name == name)
    }
}

impl IntoIterator for LaunchPlan {
    type Item = LaunchEntry;
    type IntoIter = std::vec::IntoIter<LaunchEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
