//! Individual build steps.
//!
//! Steps are plain functions over explicit inputs and a [`Mode`](crate::mode::Mode);
//! [`Pipeline`](crate::pipeline::Pipeline) wires them to the configuration,
//! caches, notifications and reload signals.

pub mod assets;
pub mod clean;
pub mod copy;
pub mod scripts;
pub mod styles;

pub use assets::copy_assets;
pub use clean::{clean, remove_generated};
pub use copy::{copy_if_newer, copy_with, CopyCache, CopyReport};
pub use scripts::{build_scripts, Bundle, ScriptJob, ScriptsOutput};
pub use styles::{compile_styles, StyleJob, StyleOutput};
