//! Build mode selection.
//!
//! The mode is decided once at process start from `NODE_ENV` and then passed
//! by value into every pipeline step. Nothing reads the environment after
//! startup.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Environment variable that selects the build mode.
pub const MODE_ENV_VAR: &str = "NODE_ENV";

/// Development or production build.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Source maps, stable filenames, resident script watcher.
    #[default]
    Development,
    /// Minified output, content-hashed filenames, manifests.
    Production,
}

impl Mode {
    /// Read the mode from `NODE_ENV`.
    pub fn from_env() -> Self {
        let value = std::env::var(MODE_ENV_VAR).ok();
        Self::from_value(value.as_deref())
    }

    /// Decide the mode from the raw variable value.
    ///
    /// Absent or `"development"` selects development. Any other value,
    /// including the empty string, selects production.
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            None | Some("development") => Mode::Development,
            Some(_) => Mode::Production,
        }
    }

    pub fn is_development(self) -> bool {
        matches!(self, Mode::Development)
    }

    pub fn is_production(self) -> bool {
        matches!(self, Mode::Production)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Development => write!(f, "development"),
            Mode::Production => write!(f, "production"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_absent_variable_is_development() {
        assert_eq!(Mode::from_value(None), Mode::Development);
    }

    #[test]
    fn test_development_literal() {
        assert_eq!(Mode::from_value(Some("development")), Mode::Development);
    }

    #[test]
    fn test_other_values_are_production() {
        assert_eq!(Mode::from_value(Some("production")), Mode::Production);
        assert_eq!(Mode::from_value(Some("staging")), Mode::Production);
        assert_eq!(Mode::from_value(Some("Development")), Mode::Production);
        assert_eq!(Mode::from_value(Some("")), Mode::Production);
    }

    #[test]
    #[serial]
    fn test_from_env_reads_node_env() {
        unsafe {
            std::env::set_var(MODE_ENV_VAR, "production");
        }
        assert!(Mode::from_env().is_production());

        unsafe {
            std::env::remove_var(MODE_ENV_VAR);
        }
        assert!(Mode::from_env().is_development());
    }

    #[test]
    fn test_default_is_development() {
        assert_eq!(Mode::default(), Mode::Development);
    }

    #[test]
    fn test_display() {
        assert_eq!(Mode::Development.to_string(), "development");
        assert_eq!(Mode::Production.to_string(), "production");
    }
}
