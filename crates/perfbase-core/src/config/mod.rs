//! Configuration for fork point resolution and baseline builds
//!
//! Two scopes are read:
//! - Global: machine-wide settings, mostly remote cache credentials
//! - Project: `perfbase.toml` next to the repository being measured

pub mod cache;
pub mod merge;
pub mod parser;
pub mod paths;
pub mod schema;
pub mod store;

pub use cache::{BuildCacheSettings, CacheOverrides, RemoteCacheCredentials};
pub use merge::merge_configs;
pub use parser::{parse_perfbase_toml, parse_perfbase_toml_str, to_toml};
pub use paths::{CONFIG_FILE_NAME, config_path_for_scope};
pub use schema::{
    BuildCacheConfig, DistributionSettings, ForkPointSettings, PerfbaseConfig,
    PerformanceTestEntry, RemoteCacheConfig,
};
pub use store::ConfigStore;

/// Configuration scope levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigScope {
    /// Per-user configuration
    Global,
    /// Project configuration, usually committed with the repository
    Project,
}
