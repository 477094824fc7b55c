//! Configuration layer merging
//!
//! Global (`~/.config/perfbase/perfbase.toml`) -> Project (`./perfbase.toml`).
//! The global layer only contributes `[build_cache]`, typically the remote
//! cache credentials of the machine; everything else belongs to the project.

use super::schema::{BuildCacheConfig, PerfbaseConfig, RemoteCacheConfig};

pub fn merge_configs(global: Option<PerfbaseConfig>, project: Option<PerfbaseConfig>) -> PerfbaseConfig {
    let global_cache = global.map(|g| g.build_cache).unwrap_or_default();
    let mut merged = project.unwrap_or_default();
    merged.build_cache = merge_build_cache(global_cache, merged.build_cache);
    merged
}

fn merge_build_cache(base: BuildCacheConfig, layer: BuildCacheConfig) -> BuildCacheConfig {
    let remote = match (base.remote, layer.remote) {
        (Some(base), Some(layer)) => Some(RemoteCacheConfig {
            url: layer.url.or(base.url),
            username: layer.username.or(base.username),
            password: layer.password.or(base.password),
        }),
        (base, layer) => layer.or(base),
    };
    BuildCacheConfig {
        enabled: layer.enabled.or(base.enabled),
        remote,
    }
}
