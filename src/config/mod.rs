//! Configuration inputs: parameter files, package lookup and launch arguments.

pub mod args;
pub mod error;
pub mod loader;
pub mod package;

pub use args::*;
pub use error::*;
pub use loader::*;
pub use package::*;
