//! Error types for fork point resolution and baseline builds.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of a perfbase operation.
///
/// Nothing is recovered locally: every variant aborts the invocation and is
/// reported to the caller.
#[derive(Debug, Error)]
pub enum BaselineError {
    /// The string is not of the form `<version>-commit-<hash>`.
    #[error("Invalid baseline identifier '{0}': expected <version>-commit-<hash>")]
    InvalidIdentifier(String),

    /// A version-control query failed or returned unusable output.
    #[error("Fork point resolution failed: {0}")]
    Resolution(String),

    /// The checkout collaborator could not produce a working copy.
    #[error("Checkout of commit {commit} failed: {reason}")]
    Checkout { commit: String, reason: String },

    /// Stale outputs of a previous run could not be removed.
    #[error("Failed to clean output directory {}: {source}", path.display())]
    CleanOutputs {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The nested build could not be started or exited unsuccessfully.
    #[error("Nested build '{program}' failed: {reason}")]
    Build { program: String, reason: String },

    /// Configuration could not be loaded, parsed or saved.
    #[error(transparent)]
    Config(#[from] anyhow::Error),
}

impl BaselineError {
    pub(crate) fn resolution(err: anyhow::Error) -> Self {
        Self::Resolution(format!("{err:#}"))
    }

    pub(crate) fn checkout(commit: &str, err: anyhow::Error) -> Self {
        Self::Checkout {
            commit: commit.to_string(),
            reason: format!("{err:#}"),
        }
    }

    pub(crate) fn build(program: &str, err: anyhow::Error) -> Self {
        Self::Build {
            program: program.to_string(),
            reason: format!("{err:#}"),
        }
    }
}

pub type Result<T, E = BaselineError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_error_keeps_context_chain() {
        let err = anyhow::anyhow!("exit status 128").context("git merge-base failed");
        let msg = BaselineError::resolution(err).to_string();
        assert!(msg.contains("git merge-base failed"));
        assert!(msg.contains("exit status 128"));
    }

    #[test]
    fn checkout_error_names_commit() {
        let err = BaselineError::checkout("def456a", anyhow::anyhow!("clone failed"));
        assert_eq!(
            err.to_string(),
            "Checkout of commit def456a failed: clone failed"
        );
    }
}
