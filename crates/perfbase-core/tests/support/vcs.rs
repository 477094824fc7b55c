use std::cell::RefCell;
use std::collections::HashMap;

use perfbase_core::vcs::VersionControl;

/// Canned repository answers plus a log of every query made.
#[derive(Default)]
pub struct FakeVcs {
    pub branch: String,
    pub merge_bases: HashMap<String, String>,
    pub ancestor: bool,
    pub files: HashMap<String, String>,
    pub short_hashes: HashMap<String, String>,
    pub fail_fetch: bool,
    pub calls: RefCell<Vec<String>>,
}

impl FakeVcs {
    pub fn on_branch(branch: &str) -> Self {
        Self {
            branch: branch.to_string(),
            ..Default::default()
        }
    }

    /// The `feature/x` scenario: master fork `abc123`, release fork `def456`.
    pub fn feature_scenario(ancestor: bool) -> Self {
        Self {
            branch: "feature/x".to_string(),
            merge_bases: HashMap::from([
                ("origin/master".to_string(), "abc123".to_string()),
                ("origin/release".to_string(), "def456".to_string()),
            ]),
            ancestor,
            files: HashMap::from([
                ("abc123".to_string(), "5.2\n".to_string()),
                ("def456".to_string(), "5.1\n".to_string()),
            ]),
            short_hashes: HashMap::from([
                ("abc123".to_string(), "abc123f".to_string()),
                ("def456".to_string(), "def456a".to_string()),
            ]),
            ..Default::default()
        }
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl VersionControl for FakeVcs {
    fn current_branch(&self) -> anyhow::Result<String> {
        self.record("current_branch".to_string());
        Ok(self.branch.clone())
    }

    fn fetch(&self, remote: &str, refs: &[&str]) -> anyhow::Result<()> {
        self.record(format!("fetch {} {}", remote, refs.join(" ")));
        if self.fail_fetch {
            anyhow::bail!("fatal: unable to access remote");
        }
        Ok(())
    }

    fn merge_base(&self, a: &str, b: &str) -> anyhow::Result<String> {
        self.record(format!("merge_base {} {}", a, b));
        self.merge_bases
            .get(a)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no merge base for {}", a))
    }

    fn is_ancestor(&self, a: &str, b: &str) -> anyhow::Result<bool> {
        self.record(format!("is_ancestor {} {}", a, b));
        Ok(self.ancestor)
    }

    fn show_file_at_commit(&self, commit: &str, path: &str) -> anyhow::Result<String> {
        self.record(format!("show {}:{}", commit, path));
        self.files
            .get(commit)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("path '{}' does not exist in '{}'", path, commit))
    }

    fn short_hash(&self, commit: &str) -> anyhow::Result<String> {
        self.record(format!("short_hash {}", commit));
        self.short_hashes
            .get(commit)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unknown commit {}", commit))
    }
}
