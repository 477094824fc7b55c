//! Version-control queries used to locate the fork point.
//!
//! The resolver only talks to the [`VersionControl`] trait, so tests can
//! replay canned answers without a real repository. [`GitCli`] implements it
//! by shelling out to the `git` binary.

mod git;

pub use git::{GitCli, git_command};

/// Read access to the repository plus the one write (`fetch`) the resolver needs.
pub trait VersionControl {
    /// Name of the checked out branch (`HEAD` when detached).
    fn current_branch(&self) -> anyhow::Result<String>;

    /// Fetch the given refs from a remote.
    fn fetch(&self, remote: &str, refs: &[&str]) -> anyhow::Result<()>;

    /// Best common ancestor of two refs.
    fn merge_base(&self, a: &str, b: &str) -> anyhow::Result<String>;

    /// Whether commit `a` is an ancestor of commit `b`.
    fn is_ancestor(&self, a: &str, b: &str) -> anyhow::Result<bool>;

    /// Contents of `path` as recorded in `commit`.
    fn show_file_at_commit(&self, commit: &str, path: &str) -> anyhow::Result<String>;

    /// Abbreviated hash of `commit`.
    fn short_hash(&self, commit: &str) -> anyhow::Result<String>;
}

impl<T: VersionControl + ?Sized> VersionControl for &T {
    fn current_branch(&self) -> anyhow::Result<String> {
        (**self).current_branch()
    }

    fn fetch(&self, remote: &str, refs: &[&str]) -> anyhow::Result<()> {
        (**self).fetch(remote, refs)
    }

    fn merge_base(&self, a: &str, b: &str) -> anyhow::Result<String> {
        (**self).merge_base(a, b)
    }

    fn is_ancestor(&self, a: &str, b: &str) -> anyhow::Result<bool> {
        (**self).is_ancestor(a, b)
    }

    fn show_file_at_commit(&self, commit: &str, path: &str) -> anyhow::Result<String> {
        (**self).show_file_at_commit(commit, path)
    }

    fn short_hash(&self, commit: &str) -> anyhow::Result<String> {
        (**self).short_hash(commit)
    }
}
