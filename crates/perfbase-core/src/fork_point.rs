//! Fork point resolution.
//!
//! Decides which historical commit acts as the performance baseline for the
//! current branch:
//! - on `master`/`release` nothing is resolved, the branch tip is the baseline;
//! - a commit baseline already configured on a performance test is adopted;
//! - otherwise the merge base with the reference branches is computed and
//!   named after the version recorded at that commit.

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{ForkPointSettings, PerformanceTestEntry};
use crate::error::{BaselineError, Result};
use crate::identifier::{BaselineIdentifier, is_commit_baseline};
use crate::vcs::VersionControl;

/// Outcome of [`ForkPointResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum ForkPointDecision {
    /// The current branch is a reference branch.
    Skip { branch: String },
    /// A commit baseline was already configured.
    Explicit { identifier: BaselineIdentifier },
    /// Derived from merge-base analysis.
    Computed {
        identifier: BaselineIdentifier,
        fork_point: String,
    },
}

impl ForkPointDecision {
    pub fn identifier(&self) -> Option<&BaselineIdentifier> {
        match self {
            Self::Skip { .. } => None,
            Self::Explicit { identifier } | Self::Computed { identifier, .. } => Some(identifier),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Skip { .. } => "skip",
            Self::Explicit { .. } => "explicit",
            Self::Computed { .. } => "computed",
        }
    }

    /// Publish a computed baseline to every registered performance test.
    ///
    /// Returns the number of entries changed. Skipped and explicit decisions
    /// leave the configuration untouched.
    pub fn apply(&self, tests: &mut [PerformanceTestEntry]) -> usize {
        let Self::Computed { identifier, .. } = self else {
            return 0;
        };
        let mut changed = 0;
        for test in tests.iter_mut() {
            if test.baselines.as_deref() != Some(identifier.as_str()) {
                test.baselines = Some(identifier.to_string());
                changed += 1;
            }
        }
        changed
    }
}

/// Resolves the fork point once per invocation.
#[derive(Debug)]
pub struct ForkPointResolver<V> {
    vcs: V,
    settings: ForkPointSettings,
}

impl<V: VersionControl> ForkPointResolver<V> {
    pub fn new(vcs: V, settings: ForkPointSettings) -> Self {
        Self { vcs, settings }
    }

    pub fn settings(&self) -> &ForkPointSettings {
        &self.settings
    }

    /// Decide the baseline for the current branch.
    ///
    /// `configured` holds baseline strings already set on performance tests,
    /// in caller order. When several are commit baselines the first one wins.
    /// Values are matched as given; surrounding whitespace disqualifies them.
    pub fn resolve<S: AsRef<str>>(&self, configured: &[S]) -> Result<ForkPointDecision> {
        let branch = self
            .vcs
            .current_branch()
            .map_err(BaselineError::resolution)?;
        if self.is_reference_branch(&branch) {
            info!(%branch, "on a reference branch, no fork point needed");
            return Ok(ForkPointDecision::Skip { branch });
        }

        if let Some(explicit) = configured
            .iter()
            .map(|s| s.as_ref())
            .find(|s| is_commit_baseline(s))
        {
            let identifier = BaselineIdentifier::parse(explicit)?;
            info!(%identifier, "commit baseline already configured");
            return Ok(ForkPointDecision::Explicit { identifier });
        }

        let (identifier, fork_point) = self.compute().map_err(BaselineError::resolution)?;
        info!(%identifier, %fork_point, "computed fork point baseline");
        Ok(ForkPointDecision::Computed {
            identifier,
            fork_point,
        })
    }

    fn is_reference_branch(&self, branch: &str) -> bool {
        branch == self.settings.master_branch || branch == self.settings.release_branch
    }

    fn compute(&self) -> anyhow::Result<(BaselineIdentifier, String)> {
        let settings = &self.settings;
        self.vcs.fetch(
            &settings.remote,
            &[
                settings.master_branch.as_str(),
                settings.release_branch.as_str(),
            ],
        )?;

        let master = format!("{}/{}", settings.remote, settings.master_branch);
        let release = format!("{}/{}", settings.remote, settings.release_branch);
        let master_fork = self.vcs.merge_base(&master, "HEAD")?;
        let release_fork = self.vcs.merge_base(&release, "HEAD")?;
        debug!(%master_fork, %release_fork, "merge bases");

        // Release branched off master later than HEAD did: prefer its fork point.
        let fork_point = if self.vcs.is_ancestor(&master_fork, &release_fork)? {
            release_fork
        } else {
            master_fork
        };

        let version = self
            .vcs
            .show_file_at_commit(&fork_point, &settings.version_file)?;
        if version.trim().is_empty() {
            anyhow::bail!(
                "{} is empty at commit {}",
                settings.version_file,
                fork_point
            );
        }
        let short_hash = self.vcs.short_hash(&fork_point)?;
        let identifier = BaselineIdentifier::from_parts(&version, &short_hash).map_err(|e| {
            anyhow::anyhow!(
                "Unusable {} at commit {}: {}",
                settings.version_file,
                fork_point,
                e
            )
        })?;

        Ok((identifier, fork_point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, baselines: Option<&str>) -> PerformanceTestEntry {
        PerformanceTestEntry {
            name: name.to_string(),
            baselines: baselines.map(str::to_string),
        }
    }

    #[test]
    fn apply_sets_every_test_for_computed() {
        let decision = ForkPointDecision::Computed {
            identifier: BaselineIdentifier::parse("5.1-commit-def456a").unwrap(),
            fork_point: "def456".to_string(),
        };
        let mut tests = vec![
            entry("performanceTest", None),
            entry("distributedPerformanceTest", Some("last")),
            entry("flakinessDetection", Some("5.1-commit-def456a")),
        ];

        assert_eq!(decision.apply(&mut tests), 2);
        assert!(
            tests
                .iter()
                .all(|t| t.baselines.as_deref() == Some("5.1-commit-def456a"))
        );
    }

    #[test]
    fn apply_leaves_explicit_and_skip_untouched() {
        let mut tests = vec![entry("performanceTest", Some("last"))];

        let skip = ForkPointDecision::Skip {
            branch: "master".to_string(),
        };
        let explicit = ForkPointDecision::Explicit {
            identifier: BaselineIdentifier::parse("5.0-commit-abc").unwrap(),
        };

        assert_eq!(skip.apply(&mut tests), 0);
        assert_eq!(explicit.apply(&mut tests), 0);
        assert_eq!(tests[0].baselines.as_deref(), Some("last"));
    }

    #[test]
    fn decision_serializes_with_tag() {
        let decision = ForkPointDecision::Skip {
            branch: "release".to_string(),
        };
        let value = toml::Value::try_from(&decision).unwrap();
        assert_eq!(value["decision"].as_str(), Some("skip"));
        assert_eq!(value["branch"].as_str(), Some("release"));
    }
}
