//! Application context wiring configuration to the two components.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{
    BuildCacheSettings, CacheOverrides, ConfigScope, ConfigStore, PerfbaseConfig, merge_configs,
    paths,
};
use crate::distribution::{
    BaselineDistributionBuilder, DistributionLayout, GitCheckout, ProcessInvoker,
};
use crate::fork_point::ForkPointDecision;
use crate::vcs::GitCli;

/// Loaded configuration plus the paths every command needs.
///
/// Frontends create this once and ask it for resolvers and builders.
#[derive(Debug, Clone)]
pub struct AppContext {
    project_root: PathBuf,
    project_store: ConfigStore,
    config: PerfbaseConfig,
}

impl AppContext {
    /// Load configuration for `project_root` using the user's config directory.
    pub fn load(project_root: impl Into<PathBuf>, config_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let global_dir = paths::default_global_dir().ok();
        Self::from_paths(project_root, global_dir.as_deref(), config_path)
    }

    /// Load configuration with an explicit global directory (or none at all).
    pub fn from_paths(
        project_root: impl Into<PathBuf>,
        global_dir: Option<&Path>,
        config_path: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        // Output paths are handed to a process running elsewhere; keep them absolute.
        let project_root = std::path::absolute(project_root.into())?;
        let project_store = match config_path {
            Some(path) => ConfigStore::at_path(project_root.join(path)),
            None => ConfigStore::from_paths(ConfigScope::Project, Path::new(""), &project_root),
        };

        let global = match global_dir {
            Some(dir) => {
                let store = ConfigStore::from_paths(ConfigScope::Global, dir, &project_root);
                store.exists().then(|| store.load()).transpose()?
            }
            None => None,
        };
        let project = project_store.load()?;
        debug!(config = %project_store.config_path().display(), "loaded project config");

        Ok(Self {
            project_root,
            project_store,
            config: merge_configs(global, Some(project)),
        })
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn config(&self) -> &PerfbaseConfig {
        &self.config
    }

    pub fn project_store(&self) -> &ConfigStore {
        &self.project_store
    }

    pub fn git(&self) -> GitCli {
        GitCli::new(self.project_root.clone())
    }

    pub fn distribution_layout(&self) -> DistributionLayout {
        DistributionLayout::new(self.project_root.join(&self.config.distribution.build_dir))
    }

    /// Checkout collaborator for the configured repository (the project itself by default).
    pub fn git_checkout(&self) -> GitCheckout {
        let source = match self.config.distribution.repository.as_deref() {
            Some(repo) if is_remote_source(repo) => repo.to_string(),
            Some(repo) => self.project_root.join(repo).display().to_string(),
            None => self.project_root.display().to_string(),
        };
        GitCheckout::new(source, self.distribution_layout().checkouts_dir())
    }

    pub fn cache_settings(&self, overrides: &CacheOverrides) -> anyhow::Result<BuildCacheSettings> {
        self.config.build_cache.resolve(overrides)
    }

    pub fn distribution_builder(
        &self,
        cache: BuildCacheSettings,
    ) -> BaselineDistributionBuilder<GitCheckout, ProcessInvoker> {
        BaselineDistributionBuilder::new(
            self.git_checkout(),
            ProcessInvoker,
            self.distribution_layout(),
            &self.config.distribution,
            cache,
        )
    }

    /// Write a computed baseline into the project's performance tests.
    ///
    /// Only the project file is rewritten, never the merged view, so global
    /// credentials stay out of it. Returns the number of tests changed.
    pub fn persist_decision(&mut self, decision: &ForkPointDecision) -> anyhow::Result<usize> {
        let mut project = self.project_store.load()?;
        let changed = decision.apply(&mut project.performance_tests);
        if changed > 0 {
            self.project_store.save(&project)?;
            decision.apply(&mut self.config.performance_tests);
        }
        Ok(changed)
    }
}

fn is_remote_source(repo: &str) -> bool {
    repo.contains("://") || (repo.contains('@') && repo.contains(':'))
}
