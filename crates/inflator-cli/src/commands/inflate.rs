//! Commands that fetch and render the remote base

use std::path::Path;

use colored::Colorize;

use crate::context::Context;
use crate::error::Result;

/// Clone `repo_url` at `git_ref` and print `kustomize build` of `subdir`.
pub fn run_inflate(ctx: &Context, repo_url: &str, git_ref: &str, subdir: &str) -> Result<()> {
    eprintln!("{}", format!("Cloning {repo_url}@{git_ref}...").green());
    let rendered = ctx.inflator.inflate(repo_url, git_ref, subdir)?;
    print!("{rendered}");
    Ok(())
}

/// Resolve the overlay's remote base, then inflate it.
pub fn run_inflate_from_kustomization(ctx: &Context, dir: &Path) -> Result<()> {
    let dir = ctx.overlay_dir(dir)?;
    let remote = ctx.inflator.resolve_base(&dir)?;
    let revision = remote.require_revision()?;
    eprintln!(
        "{}",
        format!(
            "Parsed repo: {}, ref: {}, subdir: {}",
            remote.url, revision, remote.subdir
        )
        .green()
    );
    run_inflate(ctx, &remote.url, revision, &remote.subdir)
}

/// Print the overlay's remote base.
pub fn run_resolve_base(ctx: &Context, dir: &Path, json: bool) -> Result<()> {
    let dir = ctx.overlay_dir(dir)?;
    let remote = ctx.inflator.resolve_base(&dir)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&remote)?);
        return Ok(());
    }

    println!("{}: {}", "url".dimmed(), remote.url);
    println!(
        "{}: {}",
        "revision".dimmed(),
        remote.revision.as_deref().unwrap_or("(none)")
    );
    println!("{}: {}", "subdir".dimmed(), remote.subdir);
    println!("{}: {}", "reference".dimmed(), remote);
    Ok(())
}
