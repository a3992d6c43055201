use super::ParameterSet;
use serde::Serialize;
use std::fmt;

/// Where a worker's stdout and stderr go once it is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Inherit the launcher's terminal.
    Screen,
    /// Forward every line to the launcher's log.
    Log,
    /// Both of the above.
    #[default]
    Both,
}

/// Rewrites a topic name a worker declares into the name it actually uses.
///
/// Both sides are literal strings. Leading `~` or `/` carry meaning only for
/// the ROS runtime that applies the rule, so they are never resolved here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemappingRule {
    pub declared: String,
    pub effective: String,
}

impl RemappingRule {
    pub fn new(declared: impl Into<String>, effective: impl Into<String>) -> Self {
        Self {
            declared: declared.into(),
            effective: effective.into(),
        }
    }
}

impl fmt::Display for RemappingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:={}", self.declared, self.effective)
    }
}

impl<D: Into<String>, E: Into<String>> From<(D, E)> for RemappingRule {
    fn from((declared, effective): (D, E)) -> Self {
        Self::new(declared, effective)
    }
}

/// One external ROS 2 node to start, with everything it needs at startup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerSpec {
    pub package: String,
    pub executable: String,
    /// Node name the process runs under.
    pub name: String,
    pub namespace: String,
    pub output: OutputMode,
    pub parameters: ParameterSet,
    pub remappings: Vec<RemappingRule>,
}
