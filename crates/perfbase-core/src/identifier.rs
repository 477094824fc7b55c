//! Baseline identifiers of the form `<version>-commit-<hash>`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::BaselineError;

const COMMIT_SEPARATOR: &str = "-commit-";

static COMMIT_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)+)-commit-([a-f0-9]+)$").expect("commit version pattern is valid")
});

/// Names a historical distribution built from a specific commit,
/// e.g. `5.1-commit-1a2b3c4d5e`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BaselineIdentifier {
    raw: String,
    split: usize,
}

impl BaselineIdentifier {
    /// Parse and validate an identifier.
    pub fn parse(value: &str) -> Result<Self, BaselineError> {
        let value = value.trim();
        let caps = COMMIT_VERSION_RE
            .captures(value)
            .ok_or_else(|| BaselineError::InvalidIdentifier(value.to_string()))?;
        let split = caps
            .get(1)
            .map(|m| m.end())
            .ok_or_else(|| BaselineError::InvalidIdentifier(value.to_string()))?;
        Ok(Self {
            raw: value.to_string(),
            split,
        })
    }

    /// Build an identifier from a version string and an abbreviated commit hash.
    pub fn from_parts(version: &str, short_hash: &str) -> Result<Self, BaselineError> {
        Self::parse(&format!(
            "{}{}{}",
            version.trim(),
            COMMIT_SEPARATOR,
            short_hash.trim()
        ))
    }

    /// The version portion, e.g. `5.1`.
    pub fn version(&self) -> &str {
        &self.raw[..self.split]
    }

    /// The commit hash portion, e.g. `1a2b3c4d5e`.
    pub fn commit(&self) -> &str {
        &self.raw[self.split + COMMIT_SEPARATOR.len()..]
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Returns true if the string is a commit baseline (`<version>-commit-<hash>`).
pub fn is_commit_baseline(value: &str) -> bool {
    COMMIT_VERSION_RE.is_match(value)
}

impl fmt::Display for BaselineIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for BaselineIdentifier {
    type Err = BaselineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BaselineIdentifier {
    type Error = BaselineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BaselineIdentifier> for String {
    fn from(value: BaselineIdentifier) -> Self {
        value.raw
    }
}
