//! Task implementations.
//!
//! Each task loads the configuration, builds a [`Pipeline`](crate::pipeline::Pipeline)
//! for the mode selected by `NODE_ENV`, and runs:
//!
//! - [`build`] - clean and run every step once
//! - [`watch`] - rerun steps on source changes
//! - [`serve`] - dev server over the output directory
//! - [`dev`] - build, then watch and serve
//! - [`task`] - a single step

pub mod build;
pub mod dev;
pub mod serve;
pub mod task;
pub(crate) mod utils;
pub mod watch;

pub use build::execute as build_execute;
pub use dev::execute as dev_execute;
pub use serve::execute as serve_execute;
pub use task::execute as task_execute;
pub use utils::ProjectOptions;
pub use watch::execute as watch_execute;
