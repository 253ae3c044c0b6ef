use std::path::PathBuf;

use crate::config::types::SourceSet;
use crate::hash::DEFAULT_HASH_LENGTH;

pub const CONFIG_FILE_NAME: &str = "fob-pipeline.json";
pub const ENV_PREFIX: &str = "FOB_PIPELINE_";

pub fn default_out_dir() -> PathBuf {
    PathBuf::from("public")
}

pub fn default_manifest_dir() -> PathBuf {
    PathBuf::from("manifest")
}

pub fn default_hash_length() -> usize {
    DEFAULT_HASH_LENGTH
}

pub fn default_debounce_ms() -> u64 {
    100
}

pub fn default_style_entry() -> PathBuf {
    PathBuf::from("frontend/styles/index.styl")
}

pub fn default_styles_out_dir() -> PathBuf {
    PathBuf::from("public/styles")
}

pub fn default_style_sources() -> Vec<String> {
    vec!["css".to_string(), "styl".to_string()]
}

pub fn default_style_assets() -> SourceSet {
    SourceSet {
        dir: PathBuf::from("frontend/styles"),
        extensions: vec!["svg".to_string(), "png".to_string()],
        recursive: true,
    }
}

pub fn default_script_entries() -> SourceSet {
    SourceSet {
        dir: PathBuf::from("frontend/js"),
        extensions: vec!["js".to_string()],
        recursive: false,
    }
}

pub fn default_scripts_out_dir() -> PathBuf {
    PathBuf::from("public/js")
}

pub fn default_public_path() -> String {
    "/js/".to_string()
}

pub fn default_assets() -> SourceSet {
    SourceSet {
        dir: PathBuf::from("frontend/assets"),
        extensions: Vec::new(),
        recursive: false,
    }
}

pub fn default_host() -> String {
    "127.0.0.1".to_string()
}

pub fn default_port() -> u16 {
    3000
}

pub fn default_port_attempts() -> u16 {
    20
}
