//! Commands that render manifests from the overlay's resolved base

use std::path::Path;

use colored::Colorize;
use inflator_fs::NormalizedPath;

use super::render_values;
use crate::context::Context;
use crate::error::Result;

const BANNER_OPEN: &str = "==== Merged values.yaml to be written ====";
const BANNER_CLOSE: &str = "==========================================";

/// Render the upstream chart with the overlay's merged values.
///
/// The values are echoed to stderr first so they can be checked against
/// the rendered output.
pub fn run_helm_template_with_values(ctx: &Context, dir: &Path) -> Result<()> {
    let dir = ctx.overlay_dir(dir)?;
    let values = render_values(&ctx.inflator.overlay_values(&dir)?)?;

    eprintln!("{BANNER_OPEN}");
    eprint!("{values}");
    eprintln!("{BANNER_CLOSE}");

    eprintln!("{}", "Running helm template...".green());
    let rendered = ctx.inflator.template_with_values(&dir, &values)?;
    print!("{rendered}");
    Ok(())
}

/// Mirror the overlay next to a local clone of its base and build it.
pub fn run_kustomize_build_with_local_base(
    ctx: &Context,
    dir: &Path,
    dest: Option<&Path>,
) -> Result<()> {
    let dir = ctx.overlay_dir(dir)?;
    let dest = dest.map(NormalizedPath::new).unwrap_or_else(|| ctx.cwd.clone());

    eprintln!("{}", format!("Building {dir} with local base in {dest}...").green());
    let rendered = ctx.inflator.build_with_local_base(&dir, &dest)?;
    print!("{rendered}");
    Ok(())
}
