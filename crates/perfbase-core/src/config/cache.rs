//! Build cache settings forwarded to the nested build.

use url::Url;

use super::schema::BuildCacheConfig;

/// Remote HTTP cache endpoint and credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteCacheCredentials {
    pub url: Option<Url>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Cache settings resolved once before the nested build is invoked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildCacheSettings {
    pub enabled: bool,
    pub remote: RemoteCacheCredentials,
}

impl BuildCacheSettings {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn local() -> Self {
        Self {
            enabled: true,
            remote: RemoteCacheCredentials::default(),
        }
    }

    pub fn with_remote(mut self, remote: RemoteCacheCredentials) -> Self {
        self.remote = remote;
        self
    }
}

/// Values supplied on the command line or through the environment.
/// Each one takes precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct CacheOverrides {
    pub enabled: Option<bool>,
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl BuildCacheConfig {
    /// Combine file values with overrides into plain settings.
    pub fn resolve(&self, overrides: &CacheOverrides) -> anyhow::Result<BuildCacheSettings> {
        let remote = self.remote.clone().unwrap_or_default();

        let url = match overrides.url.as_ref().or(remote.url.as_ref()) {
            Some(raw) => Some(
                Url::parse(raw)
                    .map_err(|e| anyhow::anyhow!("Invalid remote cache URL '{}': {}", raw, e))?,
            ),
            None => None,
        };

        Ok(BuildCacheSettings {
            enabled: overrides.enabled.or(self.enabled).unwrap_or(false),
            remote: RemoteCacheCredentials {
                url,
                username: overrides.username.clone().or(remote.username),
                password: overrides.password.clone().or(remote.password),
            },
        })
    }
}
