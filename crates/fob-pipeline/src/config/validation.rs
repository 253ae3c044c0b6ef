use crate::config::PipelineConfig;
use crate::error::{ConfigError, Result};
use std::path::Path;

impl PipelineConfig {
    /// Validate a resolved configuration for logical consistency.
    pub fn validate(&self) -> Result<()> {
        if self.hash_length == 0 || self.hash_length > 64 {
            return Err(invalid(
                "hash_length",
                self.hash_length.to_string(),
                "Use a value between 1 and 64",
            ));
        }

        let public_path = &self.scripts.public_path;
        if !public_path.starts_with('/') || !public_path.ends_with('/') {
            return Err(invalid(
                "scripts.public_path",
                public_path.clone(),
                "The public path must start and end with '/', e.g. \"/js/\"",
            ));
        }

        if self.styles.entry.file_stem().is_none() {
            return Err(ConfigError::MissingField {
                field: "styles.entry".to_string(),
                hint: "Point styles.entry at a stylesheet file".to_string(),
            }
            .into());
        }

        if self.server.port_attempts == 0 {
            return Err(invalid(
                "server.port_attempts",
                "0".to_string(),
                "At least one port must be tried",
            ));
        }

        // Every output location is wiped by `clean`, so it must never
        // overlap a source directory or the project root itself.
        if let Some(root) = &self.cwd {
            if &self.out_dir == root {
                return Err(invalid(
                    "out_dir",
                    self.out_dir.display().to_string(),
                    "The output root cannot be the project root",
                ));
            }
        }

        let sources: [(&str, &Path); 4] = [
            ("styles.entry", self.styles.entry.parent().unwrap_or(self.styles.entry.as_path())),
            ("styles.assets.dir", self.styles.assets.dir.as_path()),
            ("scripts.entries.dir", self.scripts.entries.dir.as_path()),
            ("assets.dir", self.assets.dir.as_path()),
        ];
        for (field, dir) in sources {
            if dir.starts_with(&self.out_dir) || self.out_dir.starts_with(dir) {
                return Err(invalid(
                    field,
                    dir.display().to_string(),
                    "Source directories must not overlap the output root",
                ));
            }
        }

        Ok(())
    }
}

fn invalid(field: &str, value: String, hint: &str) -> crate::error::CliError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value,
        hint: hint.to_string(),
    }
    .into()
}
