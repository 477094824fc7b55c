//! Execution of the nested build process.

use std::path::Path;
use std::process::Command;

use anyhow::Context;

use super::command::NestedBuildCommand;

/// Runs a nested build to completion.
pub trait BuildInvoker {
    fn invoke(&self, command: &NestedBuildCommand, working_dir: &Path) -> anyhow::Result<()>;
}

impl<T: BuildInvoker + ?Sized> BuildInvoker for &T {
    fn invoke(&self, command: &NestedBuildCommand, working_dir: &Path) -> anyhow::Result<()> {
        (**self).invoke(command, working_dir)
    }
}

/// Spawns the build as a child process sharing this process's stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessInvoker;

impl BuildInvoker for ProcessInvoker {
    fn invoke(&self, command: &NestedBuildCommand, working_dir: &Path) -> anyhow::Result<()> {
        let status = Command::new(command.program())
            .args(command.args())
            .current_dir(working_dir)
            .status()
            .with_context(|| format!("Failed to start {}", command.program()))?;
        if !status.success() {
            anyhow::bail!("{} exited with {}", command.program(), status);
        }
        Ok(())
    }
}
