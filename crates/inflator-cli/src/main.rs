//! BigBang Inflator CLI
//!
//! Resolves layered Kustomize overlays to their upstream chart, merges the
//! release values they declare, and renders the result.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::Context;
use error::Result;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

/// Log to stderr so stdout carries only rendered output.
///
/// `RUST_LOG` takes precedence over `--debug`.
fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(debug)
        .try_init();
    if result.is_ok() {
        tracing::debug!("Debug logging is enabled");
    }
}

fn run(cli: Cli) -> Result<()> {
    let ctx = Context::load(cli.config)?;
    execute_command(&ctx, cli.command)
}

fn execute_command(ctx: &Context, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::ExtractValues { input } => commands::run_extract_values(ctx, input.as_deref()),
        Commands::Inflate {
            repo_url,
            git_ref,
            subdir,
        } => commands::run_inflate(ctx, &repo_url, &git_ref, &subdir),
        Commands::InflateFromKustomization { kustomization_dir } => {
            commands::run_inflate_from_kustomization(ctx, &kustomization_dir)
        }
        Commands::ResolveBase {
            kustomization_dir,
            json,
        } => commands::run_resolve_base(ctx, &kustomization_dir, json),
        Commands::ExtractValuesFromKustomization { kustomization_dir } => {
            commands::run_extract_values_from_kustomization(ctx, &kustomization_dir)
        }
        Commands::PrintSecretValues { kustomization_dir } => {
            commands::run_print_secret_values(ctx, &kustomization_dir)
        }
        Commands::HelmTemplateWithValues { kustomization_dir } => {
            commands::run_helm_template_with_values(ctx, &kustomization_dir)
        }
        Commands::KustomizeBuildWithLocalBase {
            kustomization_dir,
            dest,
        } => commands::run_kustomize_build_with_local_base(ctx, &kustomization_dir, dest.as_deref()),
    }
}
