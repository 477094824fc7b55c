//! Perfbase - performance baseline tooling
//!
//! Usage:
//!   perfbase resolve              # Determine the fork point baseline
//!   perfbase build <IDENTIFIER>   # Build the distribution of a baseline
//!   perfbase baseline             # Resolve, then build
//!   perfbase paths <IDENTIFIER>   # Show where a baseline is installed

use std::path::PathBuf;

use anyhow::Result;
use clap::builder::BoolishValueParser;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use perfbase_core::config::CacheOverrides;
use perfbase_core::context::AppContext;
use perfbase_core::distribution::BuildOutputs;
use perfbase_core::fork_point::ForkPointDecision;
use perfbase_core::identifier::BaselineIdentifier;
use perfbase_core::pipeline::{self, BaselineOutcome, ResolveRequest};

#[derive(Parser)]
#[command(name = "perfbase")]
#[command(about = "Fork point resolution and baseline distribution builds", long_about = None)]
struct Cli {
    /// Project root (the repository being measured)
    #[arg(long, global = true, default_value = ".")]
    project: PathBuf,

    /// Project config file, relative to the project root
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Determine the commit baseline for the current branch
    Resolve(ResolveArgs),

    /// Check out and build the distribution of a commit baseline
    Build {
        /// Baseline identifier, e.g. 5.1-commit-1a2b3c4d5e
        identifier: BaselineIdentifier,

        #[command(flatten)]
        cache: CacheArgs,
    },

    /// Resolve the fork point, then build its distribution
    Baseline {
        #[command(flatten)]
        resolve: ResolveArgs,

        #[command(flatten)]
        cache: CacheArgs,
    },

    /// Show the output paths of a baseline without building it
    Paths {
        /// Baseline identifier, e.g. 5.1-commit-1a2b3c4d5e
        identifier: BaselineIdentifier,
    },
}

#[derive(Args)]
struct ResolveArgs {
    /// Already configured baseline (repeatable, checked before the config file)
    #[arg(long = "baseline", value_name = "BASELINE")]
    baselines: Vec<String>,

    /// Store a computed baseline on every performance test in the config file
    #[arg(long)]
    write: bool,
}

impl ResolveArgs {
    fn request(&self) -> ResolveRequest {
        ResolveRequest {
            baselines: self.baselines.clone(),
            write: self.write,
        }
    }
}

#[derive(Args)]
struct CacheArgs {
    /// Let the nested build use the build cache
    #[arg(long, env = "PERFBASE_BUILD_CACHE", value_parser = BoolishValueParser::new())]
    build_cache: bool,

    /// Disable the build cache even if the config or environment enables it
    #[arg(long)]
    no_build_cache: bool,

    /// Remote HTTP build cache URL
    #[arg(long, env = "PERFBASE_CACHE_URL")]
    cache_url: Option<String>,

    /// Remote build cache username
    #[arg(long, env = "PERFBASE_CACHE_USERNAME")]
    cache_username: Option<String>,

    /// Remote build cache password
    #[arg(long, env = "PERFBASE_CACHE_PASSWORD", hide_env_values = true)]
    cache_password: Option<String>,
}

impl CacheArgs {
    fn overrides(&self) -> CacheOverrides {
        let enabled = if self.no_build_cache {
            Some(false)
        } else if self.build_cache {
            Some(true)
        } else {
            None
        };
        CacheOverrides {
            enabled,
            url: self.cache_url.clone(),
            username: self.cache_username.clone(),
            password: self.cache_password.clone(),
        }
    }
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable text
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "perfbase=debug,perfbase_core=debug,info"
    } else {
        "perfbase=info,perfbase_core=info,warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut ctx = AppContext::load(&cli.project, cli.config.clone())?;
    tracing::debug!(project = %ctx.project_root().display(), "loaded configuration");

    match cli.command {
        Commands::Resolve(args) => {
            let decision = run_resolve(&mut ctx, &args)?;
            print_decision(cli.format, &decision)?;
        }
        Commands::Build { identifier, cache } => {
            let outputs = run_build(&ctx, &identifier, &cache)?;
            print_build_result(cli.format, &identifier, &outputs)?;
        }
        Commands::Baseline { resolve, cache } => {
            let outcome = run_baseline(&mut ctx, &resolve, &cache)?;
            print_outcome(cli.format, &outcome)?;
        }
        Commands::Paths { identifier } => {
            let outputs = ctx.distribution_layout().outputs(&identifier);
            print_paths(cli.format, &identifier, &outputs)?;
        }
    }

    Ok(())
}

fn run_resolve(ctx: &mut AppContext, args: &ResolveArgs) -> Result<ForkPointDecision> {
    let git = ctx.git();
    pipeline::resolve(ctx, git, &args.request())
}

fn run_build(
    ctx: &AppContext,
    identifier: &BaselineIdentifier,
    cache: &CacheArgs,
) -> Result<BuildOutputs> {
    let settings = ctx.cache_settings(&cache.overrides())?;
    let mut builder = ctx.distribution_builder(settings);
    Ok(builder.build(identifier)?)
}

fn run_baseline(
    ctx: &mut AppContext,
    resolve: &ResolveArgs,
    cache: &CacheArgs,
) -> Result<BaselineOutcome> {
    let settings = ctx.cache_settings(&cache.overrides())?;
    let mut builder = ctx.distribution_builder(settings);
    let git = ctx.git();
    pipeline::resolve_and_build(ctx, git, &mut builder, &resolve.request())
}

fn print_outcome(format: OutputFormat, outcome: &BaselineOutcome) -> Result<()> {
    match format {
        OutputFormat::Table => {
            print_decision(format, &outcome.resolution)?;
            if let (Some(identifier), Some(outputs)) =
                (outcome.resolution.identifier(), &outcome.outputs)
            {
                print_build_result(format, identifier, outputs)?;
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(outcome)?);
        }
    }
    Ok(())
}

fn print_decision(format: OutputFormat, decision: &ForkPointDecision) -> Result<()> {
    match format {
        OutputFormat::Table => match decision {
            ForkPointDecision::Skip { branch } => {
                println!("• On '{}', no fork point baseline needed", branch);
            }
            ForkPointDecision::Explicit { identifier } => {
                println!("✓ Using configured baseline {}", identifier);
            }
            ForkPointDecision::Computed {
                identifier,
                fork_point,
            } => {
                println!("✓ Fork point baseline is {}", identifier);
                println!("  Fork point commit: {}", fork_point);
            }
        },
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(decision)?);
        }
    }
    Ok(())
}

fn print_build_result(
    format: OutputFormat,
    identifier: &BaselineIdentifier,
    outputs: &BuildOutputs,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!(
                "Building fork point succeeded, now the baseline is {}",
                identifier
            );
            println!("  Distribution: {}", outputs.distribution_home.display());
            println!("  Tooling API:  {}", outputs.tooling_api_jar.display());
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "identifier": identifier,
                "outputs": outputs,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn print_paths(
    format: OutputFormat,
    identifier: &BaselineIdentifier,
    outputs: &BuildOutputs,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", outputs.distribution_home.display());
            println!("{}", outputs.tooling_api_jar.display());
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "identifier": identifier,
                "outputs": outputs,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn build_rejects_malformed_identifier() {
        let result = Cli::try_parse_from(["perfbase", "build", "nightly"]);
        assert!(result.is_err());
    }

    #[test]
    fn no_build_cache_overrides_config() {
        let cli = Cli::try_parse_from(["perfbase", "build", "5.1-commit-abc", "--no-build-cache"])
            .unwrap();
        let Commands::Build { cache, .. } = cli.command else {
            panic!("expected build command");
        };
        assert_eq!(cache.overrides().enabled, Some(false));
    }

    #[test]
    fn baseline_accepts_repeated_baselines() {
        let cli = Cli::try_parse_from([
            "perfbase",
            "baseline",
            "--baseline",
            "last",
            "--baseline",
            "5.0-commit-abc",
            "--write",
        ])
        .unwrap();
        let Commands::Baseline { resolve, .. } = cli.command else {
            panic!("expected baseline command");
        };
        assert_eq!(resolve.baselines, ["last", "5.0-commit-abc"]);
        assert!(resolve.write);
    }

    #[test]
    fn build_cache_accepts_numeric_env_value() {
        let previous = std::env::var_os("PERFBASE_BUILD_CACHE");
        unsafe {
            // Setting process-level env vars is unsafe in Rust 2024; scoped to test.
            std::env::set_var("PERFBASE_BUILD_CACHE", "1");
        }

        let enabled = Cli::try_parse_from(["perfbase", "build", "5.1-commit-abc"]).map(|cli| {
            match cli.command {
                Commands::Build { cache, .. } => cache.overrides().enabled,
                _ => None,
            }
        });
        let disabled =
            Cli::try_parse_from(["perfbase", "build", "5.1-commit-abc", "--no-build-cache"])
                .map(|cli| match cli.command {
                    Commands::Build { cache, .. } => cache.overrides().enabled,
                    _ => None,
                });

        unsafe {
            match previous {
                Some(value) => std::env::set_var("PERFBASE_BUILD_CACHE", value),
                None => std::env::remove_var("PERFBASE_BUILD_CACHE"),
            }
        }

        assert_eq!(enabled.unwrap(), Some(true));
        assert_eq!(disabled.unwrap(), Some(false));
    }
}
