//! Pure data structures describing what gets launched.
//!
//! Nothing in here touches the filesystem or spawns processes. The
//! [`Orchestrator`](crate::orchestrator::Orchestrator) builds these values and a
//! [`ProcessSupervisor`](crate::supervisor::ProcessSupervisor) consumes them.

pub mod parameters;
pub mod plan;
pub mod worker;

pub use parameters::*;
pub use plan::*;
pub use worker::*;
