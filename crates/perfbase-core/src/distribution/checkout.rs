//! Working copies of historical commits.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};

use crate::vcs::git_command;

/// Produces a working copy of the repository at a commit.
pub trait Checkout {
    /// Check out `commit` and return the workspace directory.
    fn checkout(&self, commit: &str) -> anyhow::Result<PathBuf>;
}

impl<T: Checkout + ?Sized> Checkout for &T {
    fn checkout(&self, commit: &str) -> anyhow::Result<PathBuf> {
        (**self).checkout(commit)
    }
}

/// Clones a repository once into the checkouts directory and moves the
/// working copy to the requested commit on every call.
#[derive(Debug, Clone)]
pub struct GitCheckout {
    source: String,
    checkouts_dir: PathBuf,
}

impl GitCheckout {
    /// `source` is anything `git clone` accepts: a URL or a local path.
    pub fn new(source: impl Into<String>, checkouts_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            checkouts_dir: checkouts_dir.into(),
        }
    }

    /// Workspace directory for this source, stable across runs.
    pub fn workspace_dir(&self) -> PathBuf {
        let hash = blake3::hash(self.source.as_bytes()).to_hex();
        self.checkouts_dir.join(&hash.as_str()[..16])
    }

    fn ensure_clone(&self, workspace: &Path) -> anyhow::Result<()> {
        if workspace.join(".git").exists() {
            return Ok(());
        }
        if workspace.exists() {
            std::fs::remove_dir_all(workspace).with_context(|| {
                format!("Failed to remove stale workspace: {}", workspace.display())
            })?;
        }
        std::fs::create_dir_all(&self.checkouts_dir).with_context(|| {
            format!(
                "Failed to create checkouts directory: {}",
                self.checkouts_dir.display()
            )
        })?;

        info!(source = %self.source, workspace = %workspace.display(), "cloning repository");
        Self::run_git(
            None,
            &[
                "clone",
                "--no-checkout",
                &self.source,
                workspace
                    .to_str()
                    .ok_or_else(|| anyhow::anyhow!("Invalid workspace dir"))?,
            ],
        )
    }

    /// Resolve `commit` to a full hash, fetching from origin if it is unknown.
    fn resolve_commit(workspace: &Path, commit: &str) -> anyhow::Result<String> {
        let rev = format!("{}^{{commit}}", commit);
        if let Ok(full) = Self::git_rev_parse(workspace, &rev) {
            return Ok(full);
        }
        debug!(%commit, "commit not in workspace, fetching");
        Self::run_git(Some(workspace), &["fetch", "--tags", "origin"])?;
        Self::git_rev_parse(workspace, &rev)
            .with_context(|| format!("Commit {} not found in origin", commit))
    }

    fn run_git(cwd: Option<&Path>, args: &[&str]) -> anyhow::Result<()> {
        let mut cmd = git_command();
        cmd.args(args);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }
        let output = cmd
            .output()
            .with_context(|| format!("Failed to run git {:?}", args))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git command failed {:?}: {}", args, stderr.trim());
        }
        Ok(())
    }

    fn git_rev_parse(cwd: &Path, rev: &str) -> anyhow::Result<String> {
        let output = git_command()
            .args(["rev-parse", "--verify", "--quiet", rev])
            .current_dir(cwd)
            .output()
            .with_context(|| format!("Failed to run git rev-parse {}", rev))?;
        if !output.status.success() {
            anyhow::bail!("git rev-parse {} failed", rev);
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Checkout for GitCheckout {
    fn checkout(&self, commit: &str) -> anyhow::Result<PathBuf> {
        let workspace = self.workspace_dir();
        self.ensure_clone(&workspace)?;

        let full = Self::resolve_commit(&workspace, commit)?;
        Self::run_git(Some(&workspace), &["checkout", "--force", "--detach", &full])?;
        Self::run_git(Some(&workspace), &["clean", "-fdx"])?;

        info!(%commit, workspace = %workspace.display(), "checked out baseline commit");
        Ok(workspace)
    }
}
