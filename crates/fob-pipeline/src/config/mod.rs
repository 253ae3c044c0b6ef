//! Pipeline configuration with multi-source loading.
//!
//! Priority: environment (`FOB_PIPELINE_*`) > `fob-pipeline.json` > defaults.
//! All paths are relative to the project root until [`PipelineConfig::resolve`]
//! turns them into absolute paths.

mod defaults;
mod loading;
mod types;
mod validation;

use path_clean::PathClean;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use defaults::{CONFIG_FILE_NAME, ENV_PREFIX};
pub use types::*;

/// Pipeline configuration, loaded from fob-pipeline.json and the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Output root; cleaned before every build
    pub out_dir: PathBuf,

    /// Directory receiving production manifests
    pub manifest_dir: PathBuf,

    /// Hex characters of content hash embedded in filenames
    pub hash_length: usize,

    /// Stylesheet pipeline
    pub styles: StylesConfig,

    /// Script pipeline
    pub scripts: ScriptsConfig,

    /// Static assets copied to the output root
    pub assets: SourceSet,

    /// Development server
    pub server: ServerConfig,

    /// Window in which repeated events for the same file are dropped
    pub debounce_ms: u64,

    /// Project root (defaults to the current directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            out_dir: defaults::default_out_dir(),
            manifest_dir: defaults::default_manifest_dir(),
            hash_length: defaults::default_hash_length(),
            styles: StylesConfig::default(),
            scripts: ScriptsConfig::default(),
            assets: defaults::default_assets(),
            server: ServerConfig::default(),
            debounce_ms: defaults::default_debounce_ms(),
            cwd: None,
        }
    }
}

impl PipelineConfig {
    /// Generate JSON Schema for fob-pipeline.json.
    pub fn json_schema() -> serde_json::Value {
        let schema = schemars::schema_for!(PipelineConfig);
        serde_json::to_value(schema).unwrap_or(serde_json::Value::Null)
    }

    /// Project root. Only meaningful after [`resolve`](Self::resolve).
    pub fn root(&self) -> &Path {
        self.cwd.as_deref().unwrap_or_else(|| Path::new("."))
    }

    /// Path of the style manifest.
    pub fn style_manifest_path(&self) -> PathBuf {
        self.manifest_dir.join(&self.styles.manifest)
    }

    /// Path of the script manifest.
    pub fn script_manifest_path(&self) -> PathBuf {
        self.manifest_dir.join(&self.scripts.manifest)
    }

    /// Make every path absolute against `root` (or `cwd` when set).
    pub fn resolve(mut self, root: &Path) -> Self {
        let root = match &self.cwd {
            Some(cwd) => absolutize(cwd, root),
            None => root.to_path_buf().clean(),
        };

        self.out_dir = absolutize(&self.out_dir, &root);
        self.manifest_dir = absolutize(&self.manifest_dir, &root);
        self.styles.entry = absolutize(&self.styles.entry, &root);
        self.styles.out_dir = absolutize(&self.styles.out_dir, &root);
        self.styles.assets.dir = absolutize(&self.styles.assets.dir, &root);
        self.scripts.entries.dir = absolutize(&self.scripts.entries.dir, &root);
        self.scripts.out_dir = absolutize(&self.scripts.out_dir, &root);
        self.assets.dir = absolutize(&self.assets.dir, &root);
        self.cwd = Some(root);
        self
    }

    /// Example fob-pipeline.json content.
    pub fn example_config() -> String {
        serde_json::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

fn absolutize(path: &Path, root: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf().clean()
    } else {
        root.join(path).clean()
    }
}
