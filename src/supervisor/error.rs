//! Error types for plan execution.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while executing a launch plan.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// A process could not be started.
    #[error("Failed to start {label}: {source}")]
    Spawn {
        label: String,
        #[source]
        source: std::io::Error,
    },

    /// Waiting on a running process failed.
    #[error("Failed to wait for {label}: {source}")]
    Wait {
        label: String,
        #[source]
        source: std::io::Error,
    },

    /// A process could not be stopped during shutdown.
    #[error("Failed to stop {label}: {source}")]
    Kill {
        label: String,
        #[source]
        source: std::io::Error,
    },

    /// The output log of a process could not be opened.
    #[error("Failed to open log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failure reported by a supervisor that does not run real processes.
    #[error("Supervisor error: {0}")]
    Custom(String),
}
