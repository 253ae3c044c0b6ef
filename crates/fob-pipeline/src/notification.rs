//! Human-visible failure notifications.
//!
//! Compile errors in the style and script steps never propagate out of the
//! step. They are converted into a [`Notification`] and handed to a
//! [`Notifier`], which decides where the message ends up.

use crate::ui;
use std::fmt;
use std::sync::Arc;

/// A titled error message for the developer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Short source label, e.g. `Styles` or `Scripts`
    pub title: String,
    /// Underlying error text
    pub message: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

/// Sink for step failure notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

pub type SharedNotifier = Arc<dyn Notifier>;

/// Prints notifications to stderr and emits a tracing event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: &Notification) {
        tracing::error!(title = %notification.title, "{}", notification.message);
        ui::error(&format!("[{}] {}", notification.title, notification.message));
    }
}

/// Fans a notification out to several notifiers.
pub struct FanoutNotifier {
    targets: Vec<SharedNotifier>,
}

impl FanoutNotifier {
    pub fn new(targets: Vec<SharedNotifier>) -> Self {
        Self { targets }
    }
}

impl Notifier for FanoutNotifier {
    fn notify(&self, notification: &Notification) {
        for target in &self.targets {
            target.notify(notification);
        }
    }
}
