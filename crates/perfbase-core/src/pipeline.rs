//! Resolve-then-build flow behind the `resolve` and `baseline` commands.

use serde::Serialize;
use tracing::info;

use crate::context::AppContext;
use crate::distribution::{BaselineDistributionBuilder, BuildInvoker, BuildOutputs, Checkout};
use crate::fork_point::{ForkPointDecision, ForkPointResolver};
use crate::vcs::VersionControl;

/// What a resolve request asks for beyond the project config.
#[derive(Debug, Clone, Default)]
pub struct ResolveRequest {
    /// Baselines given on the command line, checked before the config file.
    pub baselines: Vec<String>,
    /// Store a computed baseline on every performance test in the project file.
    pub write: bool,
}

/// Decision plus the distribution built for it, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaselineOutcome {
    pub resolution: ForkPointDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outputs: Option<BuildOutputs>,
}

/// Resolve the fork point for the project, persisting a computed baseline
/// when the request says so.
pub fn resolve<V: VersionControl>(
    ctx: &mut AppContext,
    vcs: V,
    request: &ResolveRequest,
) -> anyhow::Result<ForkPointDecision> {
    let mut configured = request.baselines.clone();
    configured.extend(ctx.config().configured_baselines());

    let resolver = ForkPointResolver::new(vcs, ctx.config().fork_point.clone());
    let decision = resolver.resolve(&configured)?;

    if request.write {
        let changed = ctx.persist_decision(&decision)?;
        if changed > 0 {
            info!(
                changed,
                config = %ctx.project_store().config_path().display(),
                "updated performance test baselines"
            );
        }
    }

    Ok(decision)
}

/// Resolve, then build the chosen baseline. A skipped resolution builds nothing.
pub fn resolve_and_build<V, C, I>(
    ctx: &mut AppContext,
    vcs: V,
    builder: &mut BaselineDistributionBuilder<C, I>,
    request: &ResolveRequest,
) -> anyhow::Result<BaselineOutcome>
where
    V: VersionControl,
    C: Checkout,
    I: BuildInvoker,
{
    let resolution = resolve(ctx, vcs, request)?;
    let outputs = match resolution.identifier() {
        Some(identifier) => Some(builder.build(identifier)?),
        None => {
            info!("no baseline to build");
            None
        }
    };
    Ok(BaselineOutcome {
        resolution,
        outputs,
    })
}
