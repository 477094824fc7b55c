//! Command line of the nested baseline build.

use std::fmt;
use std::path::Path;

use tracing::warn;

use super::layout::BuildOutputs;
use crate::config::BuildCacheSettings;

const MASK: &str = "****";

/// Program and arguments for one nested build.
///
/// `Display` renders the command with secret values masked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedBuildCommand {
    program: String,
    args: Vec<String>,
    secrets: Vec<usize>,
}

impl NestedBuildCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            secrets: Vec::new(),
        }
    }

    /// Build the `clean :install :toolingApi:installToolingApiShadedJar` invocation.
    pub fn for_baseline(
        program: impl Into<String>,
        init_script: &Path,
        outputs: &BuildOutputs,
        cache: &BuildCacheSettings,
    ) -> Self {
        let mut cmd = Self::new(program)
            .arg("--init-script")
            .arg(init_script.display().to_string())
            .arg("clean")
            .arg(":install")
            .arg(format!(
                "-Pgradle_installPath={}",
                outputs.distribution_home.display()
            ))
            .arg(":toolingApi:installToolingApiShadedJar")
            .arg(format!(
                "-PtoolingApiShadedJarInstallPath={}",
                outputs.tooling_api_jar.display()
            ));

        if cache.enabled {
            cmd = cmd.arg("--build-cache");

            if let Some(url) = &cache.remote.url {
                if cache.remote.username.is_none() || cache.remote.password.is_none() {
                    warn!(%url, "remote build cache configured without full credentials");
                }
                let username = cache.remote.username.as_deref().unwrap_or_default();
                let password = cache.remote.password.as_deref().unwrap_or_default();
                cmd = cmd
                    .arg(format!("-Dgradle.cache.remote.url={url}"))
                    .arg(format!("-Dgradle.cache.remote.username={username}"))
                    .secret_arg(format!("-Dgradle.cache.remote.password={password}"));
            }
        }

        cmd
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add an argument whose value is hidden when displayed.
    pub fn secret_arg(mut self, arg: impl Into<String>) -> Self {
        self.secrets.push(self.args.len());
        self.args.push(arg.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn display_arg(&self, index: usize) -> String {
        let arg = &self.args[index];
        if !self.secrets.contains(&index) {
            return arg.clone();
        }
        match arg.split_once('=') {
            Some((key, _)) => format!("{key}={MASK}"),
            None => MASK.to_string(),
        }
    }
}

impl fmt::Display for NestedBuildCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for index in 0..self.args.len() {
            write!(f, " {}", self.display_arg(index))?;
        }
        Ok(())
    }
}
