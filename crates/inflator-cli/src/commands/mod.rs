//! Command implementations for inflator-cli

pub mod inflate;
pub mod render;
pub mod values;

pub use inflate::{run_inflate, run_inflate_from_kustomization, run_resolve_base};
pub use render::{run_helm_template_with_values, run_kustomize_build_with_local_base};
pub use values::{run_extract_values, run_extract_values_from_kustomization, run_print_secret_values};

/// Render a values document for display.
///
/// Blank lines are squeezed out so merged documents read as one block.
pub fn render_values(values: &serde_yaml::Value) -> crate::error::Result<String> {
    let text = inflator_core::manifest::render_document(values)?;
    Ok(text.replace("\n\n", "\n"))
}
