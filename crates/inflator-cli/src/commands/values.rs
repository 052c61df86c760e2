//! Values extraction commands

use std::io::Read;
use std::path::Path;

use colored::Colorize;

use super::render_values;
use crate::context::Context;
use crate::error::Result;

/// Print the values document of one ConfigMap manifest.
pub fn run_extract_values(ctx: &Context, input: Option<&Path>) -> Result<()> {
    let manifest = match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)?,
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let values = ctx.inflator.extract_values(&manifest)?;
    print!("{}", render_values(&values)?);
    Ok(())
}

/// Print the merged values of an overlay.
pub fn run_extract_values_from_kustomization(ctx: &Context, dir: &Path) -> Result<()> {
    let dir = ctx.overlay_dir(dir)?;
    let values = ctx.inflator.overlay_values(&dir)?;
    print!("{}", render_values(&values)?);
    Ok(())
}

/// Print each decrypted Secret values fragment under its name.
pub fn run_print_secret_values(ctx: &Context, dir: &Path) -> Result<()> {
    let dir = ctx.overlay_dir(dir)?;
    for (name, values) in ctx.inflator.secret_values(&dir)? {
        println!("{}", format!("Secret: {name}").green().bold());
        print!("{values}");
        if !values.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}
