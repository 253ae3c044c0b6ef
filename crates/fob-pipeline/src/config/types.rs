use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::defaults::*;

/// A directory plus the file extensions that belong to one step.
///
/// An empty extension list accepts any file that has an extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SourceSet {
    /// Directory to scan
    pub dir: PathBuf,

    /// Accepted extensions without the dot (case-insensitive)
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Descend into subdirectories
    #[serde(default)]
    pub recursive: bool,
}

impl SourceSet {
    /// Does `path` belong to this set? Only the location and extension are
    /// checked, not whether the file exists.
    pub fn matches(&self, path: &Path) -> bool {
        let Ok(relative) = path.strip_prefix(&self.dir) else {
            return false;
        };

        if !self.recursive && relative.components().count() != 1 {
            return false;
        }

        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };

        self.extensions.is_empty()
            || self
                .extensions
                .iter()
                .any(|accepted| accepted.eq_ignore_ascii_case(ext))
    }
}

/// Stylesheet pipeline settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct StylesConfig {
    /// Stylesheet entry point
    pub entry: PathBuf,

    /// Directory receiving compiled CSS and copied images
    pub out_dir: PathBuf,

    /// Manifest filename inside `manifest_dir`
    pub manifest: String,

    /// Extensions that trigger a style rebuild in watch mode
    pub watch_extensions: Vec<String>,

    /// Images living next to the stylesheets
    pub assets: SourceSet,
}

impl Default for StylesConfig {
    fn default() -> Self {
        Self {
            entry: default_style_entry(),
            out_dir: default_styles_out_dir(),
            manifest: "css.json".to_string(),
            watch_extensions: default_style_sources(),
            assets: default_style_assets(),
        }
    }
}

impl StylesConfig {
    /// The stylesheet sources watched for rebuilds: every watch extension
    /// under the entry's directory.
    pub fn watch_set(&self) -> SourceSet {
        SourceSet {
            dir: self
                .entry
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
            extensions: self.watch_extensions.clone(),
            recursive: true,
        }
    }
}

/// Script pipeline settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct ScriptsConfig {
    /// Entry points: each matching file becomes one bundle
    pub entries: SourceSet,

    /// Directory receiving bundles
    pub out_dir: PathBuf,

    /// URL prefix the bundles are served under; stripped in the manifest
    pub public_path: String,

    /// Manifest filename inside `manifest_dir`
    pub manifest: String,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            entries: default_script_entries(),
            out_dir: default_scripts_out_dir(),
            public_path: default_public_path(),
            manifest: "webpack.json".to_string(),
        }
    }
}

/// Development server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// First port to try; 0 lets the OS choose
    pub port: u16,

    /// How many successive ports to try before giving up
    pub port_attempts: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            port_attempts: default_port_attempts(),
        }
    }
}
