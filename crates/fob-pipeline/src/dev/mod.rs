//! Development server and live reload.
//!
//! - [`ReloadHub`] tracks connected browsers and broadcasts [`ReloadEvent`]s
//! - [`FileWatcher`] turns filesystem events into debounced [`FileChange`]s
//! - [`OutputWatcher`] watches the output tree and signals reloads
//! - [`DevServer`] serves the output tree with the reload client injected

pub mod notifier;
pub mod output_watcher;
pub mod server;
pub mod state;
pub mod watcher;

pub use notifier::BrowserNotifier;
pub use output_watcher::OutputWatcher;
pub use server::DevServer;
pub use state::{ReloadHub, SharedHub};
pub use watcher::{FileChange, FileWatcher};

use serde::{Deserialize, Serialize};

/// Events pushed to browsers over Server-Sent Events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ReloadEvent {
    /// Reload the whole page
    Reload,

    /// Refresh stylesheets in place; `paths` are URL paths
    Css { paths: Vec<String> },

    /// A step failed; shown as a banner until the next reload
    Error { title: String, message: String },

    /// Sent to a client right after it connects
    Connected { id: usize },
}
