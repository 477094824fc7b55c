//! Configuration schema for perfbase.toml
//!
//! ```toml
//! [fork_point]
//! remote = "origin"
//! version_file = "version.txt"
//!
//! [distribution]
//! build_dir = "build"
//!
//! [build_cache]
//! enabled = true
//! [build_cache.remote]
//! url = "https://cache.example.com/cache/"
//!
//! [[performance_test]]
//! name = "performanceTest"
//! baselines = "5.1-commit-1a2b3c4d5e"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration structure for perfbase.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerfbaseConfig {
    /// Reference branches and the version file used for fork point resolution
    #[serde(default)]
    pub fork_point: ForkPointSettings,

    /// Where and how baseline distributions are built
    #[serde(default)]
    pub distribution: DistributionSettings,

    /// Build cache passthrough for the nested build
    #[serde(default, skip_serializing_if = "BuildCacheConfig::is_empty")]
    pub build_cache: BuildCacheConfig,

    /// Registered performance tests and their configured baselines
    #[serde(
        default,
        rename = "performance_test",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub performance_tests: Vec<PerformanceTestEntry>,
}

impl PerfbaseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Baseline strings configured on performance tests, in file order.
    pub fn configured_baselines(&self) -> Vec<String> {
        self.performance_tests
            .iter()
            .filter_map(|t| t.baselines.clone())
            .collect()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.fork_point.validate()?;
        self.distribution.validate()?;
        self.build_cache.validate()?;
        for test in &self.performance_tests {
            if test.name.trim().is_empty() {
                anyhow::bail!("performance_test entries require a name");
            }
        }
        Ok(())
    }
}

/// Remote and branch names consulted when computing the fork point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForkPointSettings {
    pub remote: String,
    pub master_branch: String,
    pub release_branch: String,
    /// File holding the base version, read at the fork point commit
    pub version_file: String,
}

impl Default for ForkPointSettings {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            master_branch: "master".to_string(),
            release_branch: "release".to_string(),
            version_file: "version.txt".to_string(),
        }
    }
}

impl ForkPointSettings {
    fn validate(&self) -> anyhow::Result<()> {
        for (key, value) in [
            ("remote", &self.remote),
            ("master_branch", &self.master_branch),
            ("release_branch", &self.release_branch),
            ("version_file", &self.version_file),
        ] {
            if value.trim().is_empty() {
                anyhow::bail!("fork_point.{} must not be empty", key);
            }
        }
        Ok(())
    }
}

/// Layout and entry point of the nested baseline build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionSettings {
    /// Root for checkouts and built distributions, relative to the project root
    pub build_dir: PathBuf,
    /// Build entry point inside the checkout
    pub build_tool: String,
    /// Init script enabling build scans, relative to the checkout
    pub init_script: PathBuf,
    /// Repository to check out (URL or path); defaults to the project itself
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
}

impl Default for DistributionSettings {
    fn default() -> Self {
        Self {
            build_dir: PathBuf::from("build"),
            build_tool: "./gradlew".to_string(),
            init_script: PathBuf::from("gradle/init-scripts/build-scan.init.gradle.kts"),
            repository: None,
        }
    }
}

impl DistributionSettings {
    fn validate(&self) -> anyhow::Result<()> {
        if self.build_tool.trim().is_empty() {
            anyhow::bail!("distribution.build_tool must not be empty");
        }
        if self.build_dir.as_os_str().is_empty() {
            anyhow::bail!("distribution.build_dir must not be empty");
        }
        Ok(())
    }
}

/// `[build_cache]` as written in a config file. Every field is optional so
/// global and project layers can be merged field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildCacheConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteCacheConfig>,
}

impl BuildCacheConfig {
    pub fn is_empty(&self) -> bool {
        self.enabled.is_none() && self.remote.is_none()
    }

    fn validate(&self) -> anyhow::Result<()> {
        if let Some(remote) = &self.remote
            && let Some(raw) = &remote.url
        {
            url::Url::parse(raw)
                .map_err(|e| anyhow::anyhow!("build_cache.remote.url '{}' is invalid: {}", raw, e))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCacheConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// A registered performance test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceTestEntry {
    pub name: String,

    /// Baseline the test compares against (a version, `last`, or a commit baseline)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baselines: Option<String>,
}
