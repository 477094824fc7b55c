//! Baseline distributions built from historical commits.
//!
//! A build checks out the baseline commit, removes the outputs of any
//! previous run and invokes the checked out project's own build to install
//! the distribution and the shaded tooling API jar.

mod builder;
mod checkout;
mod command;
mod invoker;
mod layout;

pub use builder::{BaselineDistributionBuilder, BuildStage};
pub use checkout::{Checkout, GitCheckout};
pub use command::NestedBuildCommand;
pub use invoker::{BuildInvoker, ProcessInvoker};
pub use layout::{BuildOutputs, DistributionLayout};
