use crate::config::defaults::{CONFIG_FILE_NAME, ENV_PREFIX};
use crate::config::PipelineConfig;
use crate::error::{ConfigError, Result};
use figment::{
    providers::{Env, Format as _, Json, Serialized},
    Figment,
};
use std::path::{Path, PathBuf};

impl PipelineConfig {
    /// Load configuration for the project at `root`.
    ///
    /// An explicit `config_path` must exist; otherwise `fob-pipeline.json`
    /// in `root` is used when present. `FOB_PIPELINE_*` variables override
    /// file values, with `__` separating nested keys
    /// (`FOB_PIPELINE_SERVER__PORT=4000`). The result is resolved against
    /// `root` and validated.
    pub fn load(root: &Path, config_path: Option<&Path>) -> Result<Self> {
        let figment = Self::figment(root, config_path)?;

        let config: Self = figment.extract().map_err(|e| ConfigError::InvalidValue {
            field: "configuration".to_string(),
            value: e.to_string(),
            hint: format!("Check {} syntax and field types", CONFIG_FILE_NAME),
        })?;

        let config = config.resolve(root);
        config.validate()?;
        Ok(config)
    }

    fn figment(root: &Path, config_path: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let config_file = match config_path {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    root.join(path)
                };
                if !path.exists() {
                    return Err(ConfigError::NotFound(path).into());
                }
                Some(path)
            }
            None => {
                let default_path: PathBuf = root.join(CONFIG_FILE_NAME);
                default_path.exists().then_some(default_path)
            }
        };

        if let Some(path) = config_file {
            tracing::debug!(path = %path.display(), "loading config file");
            figment = figment.merge(Json::file(path));
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }
}
