//! Config store for loading and saving perfbase.toml.

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::{ConfigScope, PerfbaseConfig, parser, paths};

#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    pub fn from_paths(scope: ConfigScope, global_dir: &Path, project_root: &Path) -> Self {
        Self {
            config_path: paths::config_path_for_scope(scope, global_dir, project_root),
        }
    }

    /// A store backed by an explicit file, e.g. `--config ci/perfbase.toml`.
    pub fn at_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn exists(&self) -> bool {
        self.config_path.exists()
    }

    pub fn load(&self) -> anyhow::Result<PerfbaseConfig> {
        if !self.config_path.exists() {
            return Ok(PerfbaseConfig::new());
        }
        parser::parse_perfbase_toml(&self.config_path)
    }

    pub fn save(&self, config: &PerfbaseConfig) -> anyhow::Result<()> {
        let content = parser::to_toml(config)?;
        if let Some(parent) = self.config_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(&self.config_path, content).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;
        Ok(())
    }
}
