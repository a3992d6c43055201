//! Runtime wiring and lifecycle management.
//!
//! - [`launch`] - Builds a plan and hands it to a supervisor
//! - [`LaunchSystem`] - Owns running child processes until they exit or are stopped
//! - [`shutdown_signal`] - Resolves on Ctrl-C or SIGTERM
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod launch;
pub mod launch_system;
pub mod signal;
pub mod tracing;

pub use launch::*;
pub use launch_system::*;
pub use self::signal::shutdown_signal;
pub use self::tracing::setup_tracing;
