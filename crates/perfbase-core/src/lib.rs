//! Perfbase Core Library
//!
//! Locates the fork point commit a branch should be compared against in
//! performance tests, and builds the distribution of that commit to serve as
//! the baseline.

pub mod config;
pub mod context;
pub mod distribution;
pub mod error;
pub mod fork_point;
pub mod identifier;
pub mod pipeline;
pub mod vcs;

/// Re-exports of commonly used types
pub mod prelude {
    pub use crate::config::{
        BuildCacheSettings, CacheOverrides, ConfigStore, DistributionSettings, ForkPointSettings,
        PerfbaseConfig, PerformanceTestEntry, RemoteCacheCredentials,
    };
    pub use crate::context::AppContext;
    pub use crate::distribution::{
        BaselineDistributionBuilder, BuildInvoker, BuildOutputs, BuildStage, Checkout,
        DistributionLayout, GitCheckout, NestedBuildCommand, ProcessInvoker,
    };
    pub use crate::error::BaselineError;
    pub use crate::fork_point::{ForkPointDecision, ForkPointResolver};
    pub use crate::identifier::BaselineIdentifier;
    pub use crate::pipeline::{BaselineOutcome, ResolveRequest};
    pub use crate::vcs::{GitCli, VersionControl};
}
