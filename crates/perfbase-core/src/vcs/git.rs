//! `git` command-line backend.

use std::path::PathBuf;
use std::process::{Command, Output};

use anyhow::Context;
use tracing::debug;

use super::VersionControl;

const GIT_ENV_OVERRIDES: [&str; 4] = [
    "GIT_DIR",
    "GIT_WORK_TREE",
    "GIT_INDEX_FILE",
    "GIT_COMMON_DIR",
];

/// A `git` command that ignores repository overrides inherited from the
/// environment (e.g. when running inside a git hook).
pub fn git_command() -> Command {
    let mut cmd = Command::new("git");
    for key in GIT_ENV_OVERRIDES {
        cmd.env_remove(key);
    }
    cmd
}

/// Runs `git` inside a repository working directory.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_dir: PathBuf,
}

impl GitCli {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }

    fn output(&self, args: &[&str]) -> anyhow::Result<Output> {
        debug!(repo = %self.repo_dir.display(), ?args, "running git");
        git_command()
            .args(args)
            .current_dir(&self.repo_dir)
            .output()
            .with_context(|| format!("Failed to run git {:?}", args))
    }

    /// Run git and return trimmed stdout, failing on a non-zero exit.
    fn stdout(&self, args: &[&str]) -> anyhow::Result<String> {
        let output = self.output(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "Git command failed {:?} ({}): {}",
                args,
                output.status,
                stderr.trim()
            );
        }
        let stdout =
            String::from_utf8(output.stdout).context("Git output is not valid UTF-8")?;
        Ok(stdout.trim().to_string())
    }
}

impl VersionControl for GitCli {
    fn current_branch(&self) -> anyhow::Result<String> {
        self.stdout(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    fn fetch(&self, remote: &str, refs: &[&str]) -> anyhow::Result<()> {
        let mut args = vec!["fetch", remote];
        args.extend_from_slice(refs);
        self.stdout(&args).map(|_| ())
    }

    fn merge_base(&self, a: &str, b: &str) -> anyhow::Result<String> {
        let commit = self.stdout(&["merge-base", a, b])?;
        if commit.is_empty() {
            anyhow::bail!("No merge base between {} and {}", a, b);
        }
        Ok(commit)
    }

    fn is_ancestor(&self, a: &str, b: &str) -> anyhow::Result<bool> {
        let args = ["merge-base", "--is-ancestor", a, b];
        let output = self.output(&args)?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                anyhow::bail!(
                    "Git command failed {:?} ({}): {}",
                    args,
                    output.status,
                    stderr.trim()
                )
            }
        }
    }

    fn show_file_at_commit(&self, commit: &str, path: &str) -> anyhow::Result<String> {
        self.stdout(&["show", &format!("{}:{}", commit, path)])
            .with_context(|| format!("Failed to read {} at {}", path, commit))
    }

    fn short_hash(&self, commit: &str) -> anyhow::Result<String> {
        self.stdout(&["rev-parse", "--short", commit])
    }
}
