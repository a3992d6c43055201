//! # AWSIM Launch
//!
//! > **Starts the AWSIM simulator next to the map and prediction nodes it talks to.**
//!
//! This crate assembles a launch plan for four processes: the lanelet2 map
//! loader, the map projection loader, the map based prediction node, and the
//! simulator itself. The nodes are pre-built ROS 2 executables. All this crate
//! does is feed each one its parameter file and rewrite topic names so the
//! independently built nodes find each other.
//!
//! ## 🏗️ Design
//!
//! Building a plan and running a plan are separate steps.
//!
//! - The [`Orchestrator`](orchestrator::Orchestrator) is a pure builder. It reads
//!   parameter files through an injected [`ConfigLoader`](config::ConfigLoader)
//!   and returns a [`LaunchPlan`](model::LaunchPlan) or a
//!   [`ConfigLoadError`](config::ConfigLoadError). A missing file means no plan
//!   at all, never half of one.
//! - A [`ProcessSupervisor`](supervisor::ProcessSupervisor) takes the plan by
//!   value and runs it. The real one spawns children, the dry-run one prints
//!   them, the mock one records them for tests.
//!
//! ### Parameter precedence
//! Values passed by the launcher (currently only `lanelet2_map_path`) are
//! merged over the values from the parameter file with
//! [`merge_params`](model::merge_params): on a collision the launcher wins.
//!
//! ### Topic remapping
//! Remapping rules are literal `declared -> effective` string pairs. A leading
//! `~` or `/` is left for the ROS runtime to resolve.
//!
//! ## 🗺️ Module Tour
//!
//! - [`model`] - Plain data: parameter sets, worker specs, the plan.
//! - [`config`] - Parameter file loading, package lookup, launch arguments.
//! - [`orchestrator`] - The fixed node table and plan construction.
//! - [`supervisor`] - Command rendering and the supervisors that execute plans.
//! - [`runtime`] - Tracing setup, process lifecycle, and the [`launch`](runtime::launch) entry point.
//! - [`cli`] - Flags of the `awsim-launch` binary.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Show what would run
//! awsim-launch --dry-run lanelet2_map_path:=/maps/town.osm AWSIM_path:=/opt/awsim/run.sh
//!
//! # Run it, with parameter files from a local directory
//! RUST_LOG=debug awsim-launch --params-dir ./config \
//!     lanelet2_map_path:=/maps/town.osm AWSIM_path:=/opt/awsim/run.sh
//! ```

pub mod cli;
pub mod config;
pub mod model;
pub mod orchestrator;
pub mod runtime;
pub mod supervisor;
