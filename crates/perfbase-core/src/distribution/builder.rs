//! Checkout-clean-build pipeline for baseline distributions.

use std::path::{Path, PathBuf};

use tracing::{error, info};

use super::checkout::Checkout;
use super::command::NestedBuildCommand;
use super::invoker::BuildInvoker;
use super::layout::{BuildOutputs, DistributionLayout};
use crate::config::{BuildCacheSettings, DistributionSettings};
use crate::error::{BaselineError, Result};
use crate::identifier::BaselineIdentifier;

/// Progress of a single [`BaselineDistributionBuilder::build`] call.
///
/// `Idle -> CheckingOut -> CleaningOutputs -> Building -> Done`; a failing
/// step moves to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    Idle,
    CheckingOut,
    CleaningOutputs,
    Building,
    Done,
    Failed,
}

/// Builds the distribution and tooling API jar of a baseline commit.
pub struct BaselineDistributionBuilder<C, I> {
    checkout: C,
    invoker: I,
    layout: DistributionLayout,
    build_tool: String,
    init_script: PathBuf,
    cache: BuildCacheSettings,
    stage: BuildStage,
}

impl<C: Checkout, I: BuildInvoker> BaselineDistributionBuilder<C, I> {
    pub fn new(
        checkout: C,
        invoker: I,
        layout: DistributionLayout,
        settings: &DistributionSettings,
        cache: BuildCacheSettings,
    ) -> Self {
        Self {
            checkout,
            invoker,
            layout,
            build_tool: settings.build_tool.clone(),
            init_script: settings.init_script.clone(),
            cache,
            stage: BuildStage::Idle,
        }
    }

    pub fn layout(&self) -> &DistributionLayout {
        &self.layout
    }

    /// Last stage reached by the most recent build.
    pub fn stage(&self) -> BuildStage {
        self.stage
    }

    /// Check out the baseline commit, remove old outputs and run the nested build.
    ///
    /// Nothing is cleaned up on failure; the next run starts by deleting the
    /// output directory again.
    pub fn build(&mut self, identifier: &BaselineIdentifier) -> Result<BuildOutputs> {
        self.stage = BuildStage::Idle;

        self.enter(BuildStage::CheckingOut, identifier);
        let checkout_dir = self
            .checkout
            .checkout(identifier.commit())
            .map_err(|e| self.fail(BaselineError::checkout(identifier.commit(), e)))?;

        self.enter(BuildStage::CleaningOutputs, identifier);
        let outputs = self.layout.outputs(identifier);
        clean_output_dir(&outputs.distribution_home).map_err(|e| self.fail(e))?;

        self.enter(BuildStage::Building, identifier);
        let command = self.nested_command(&checkout_dir, &outputs);
        info!(%command, dir = %checkout_dir.display(), "starting nested build");
        let tool = self.build_tool.clone();
        self.invoker
            .invoke(&command, &checkout_dir)
            .map_err(|e| self.fail(BaselineError::build(&tool, e)))?;

        self.enter(BuildStage::Done, identifier);
        Ok(outputs)
    }

    fn nested_command(&self, checkout_dir: &Path, outputs: &BuildOutputs) -> NestedBuildCommand {
        let init_script = checkout_dir.join(&self.init_script);
        let program = resolve_program(&self.build_tool, checkout_dir);
        NestedBuildCommand::for_baseline(program, &init_script, outputs, &self.cache)
    }

    fn enter(&mut self, stage: BuildStage, identifier: &BaselineIdentifier) {
        info!(%identifier, from = ?self.stage, to = ?stage, "baseline build stage");
        self.stage = stage;
    }

    fn fail(&mut self, err: BaselineError) -> BaselineError {
        error!(stage = ?self.stage, error = %err, "baseline build failed");
        self.stage = BuildStage::Failed;
        err
    }
}

/// Remove the output directory of a previous run. Missing is fine.
fn clean_output_dir(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(BaselineError::CleanOutputs {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Anchor a relative build tool path such as `./gradlew` at the checkout.
/// Bare program names are left for `PATH` lookup.
fn resolve_program(build_tool: &str, checkout_dir: &Path) -> String {
    let path = Path::new(build_tool);
    if path.is_relative() && path.components().count() > 1 {
        checkout_dir.join(path).display().to_string()
    } else {
        build_tool.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_tool_is_anchored_at_checkout() {
        let dir = Path::new("/co");
        assert_eq!(resolve_program("./gradlew", dir), "/co/./gradlew");
        assert_eq!(resolve_program("bin/gradle", dir), "/co/bin/gradle");
    }

    #[test]
    fn bare_and_absolute_tools_are_unchanged() {
        let dir = Path::new("/co");
        assert_eq!(resolve_program("gradle", dir), "gradle");
        assert_eq!(resolve_program("/opt/gradle/bin/gradle", dir), "/opt/gradle/bin/gradle");
    }

    #[test]
    fn cleaning_missing_dir_succeeds() {
        let temp = tempfile::TempDir::new().unwrap();
        clean_output_dir(&temp.path().join("missing")).unwrap();
    }
}
