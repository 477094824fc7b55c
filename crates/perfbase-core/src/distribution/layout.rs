//! Output locations of baseline distributions.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::identifier::BaselineIdentifier;

/// Distribution directory and tooling API jar built for one baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildOutputs {
    pub distribution_home: PathBuf,
    pub tooling_api_jar: PathBuf,
}

/// Maps baseline identifiers to paths under the build directory.
///
/// Only the version part of an identifier is used, so rebuilding the same
/// version from a different commit lands in the same place.
#[derive(Debug, Clone)]
pub struct DistributionLayout {
    build_dir: PathBuf,
}

impl DistributionLayout {
    pub fn new(build_dir: impl Into<PathBuf>) -> Self {
        Self {
            build_dir: build_dir.into(),
        }
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    pub fn distributions_dir(&self) -> PathBuf {
        self.build_dir.join("distributions")
    }

    pub fn checkouts_dir(&self) -> PathBuf {
        self.build_dir.join("checkouts")
    }

    pub fn outputs(&self, identifier: &BaselineIdentifier) -> BuildOutputs {
        let version = identifier.version();
        let dir = self.distributions_dir();
        BuildOutputs {
            distribution_home: dir.join(format!("gradle-{version}")),
            tooling_api_jar: dir.join(format!("gradle-tooling-api-{version}.jar")),
        }
    }
}
