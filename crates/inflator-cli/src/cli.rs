//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// BigBang Inflator - Resolve, merge, and render Big Bang Kustomize overlays
#[derive(Parser, Debug)]
#[command(name = "bb-inflator")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Additional configuration file, applied over global and project config
    #[arg(long, global = true, env = "BB_INFLATOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Extract values.yaml from a ConfigMap manifest and output it as YAML
    ExtractValues {
        /// YAML manifest file (default: stdin)
        #[arg(short, long = "input")]
        input: Option<PathBuf>,
    },

    /// Clone a chart repository at a revision and run kustomize build on it
    Inflate {
        /// Git repository URL to clone
        #[arg(long)]
        repo_url: String,

        /// Branch, tag, or commit to check out
        #[arg(long = "ref")]
        git_ref: String,

        /// Subdirectory within the repository to build (default: repository root)
        #[arg(long, default_value = "")]
        subdir: String,
    },

    /// Inflate the remote base an overlay directory builds on
    InflateFromKustomization {
        /// Overlay directory
        kustomization_dir: PathBuf,
    },

    /// Print the remote base an overlay directory builds on
    ResolveBase {
        /// Overlay directory
        kustomization_dir: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Merge values.yaml from ConfigMaps and Secrets in HelmRelease valuesFrom order
    ///
    /// Runs kustomize build on the overlay, decrypts every secrets.enc.yaml
    /// reachable through local bases with sops, and deep-merges the fragments
    /// the release references.
    ExtractValuesFromKustomization {
        /// Overlay directory
        kustomization_dir: PathBuf,
    },

    /// Print every decrypted values.yaml from secrets.enc.yaml files
    PrintSecretValues {
        /// Overlay directory
        kustomization_dir: PathBuf,
    },

    /// Render the upstream Helm chart using the overlay's merged values
    HelmTemplateWithValues {
        /// Overlay directory
        kustomization_dir: PathBuf,
    },

    /// Copy the overlay and its local bases next to a local clone of the
    /// remote base, rewrite all bases to local paths, and build the copy
    KustomizeBuildWithLocalBase {
        /// Overlay directory
        kustomization_dir: PathBuf,

        /// Destination directory (default: current directory)
        #[arg(long)]
        dest: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_inflate() {
        let cli = Cli::parse_from([
            "bb-inflator",
            "inflate",
            "--repo-url",
            "https://repo1.dso.mil/big-bang/bigbang.git",
            "--ref",
            "2.52.0",
        ]);
        assert_eq!(
            cli.command,
            Commands::Inflate {
                repo_url: "https://repo1.dso.mil/big-bang/bigbang.git".into(),
                git_ref: "2.52.0".into(),
                subdir: String::new(),
            }
        );
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["bb-inflator", "resolve-base", "overlays/dev", "--json", "--debug"]);
        assert!(cli.debug);
        assert_eq!(
            cli.command,
            Commands::ResolveBase {
                kustomization_dir: PathBuf::from("overlays/dev"),
                json: true,
            }
        );
    }

    #[test]
    fn parse_extract_values_short_input() {
        let cli = Cli::parse_from(["bb-inflator", "extract-values", "-i", "cm.yaml"]);
        assert_eq!(
            cli.command,
            Commands::ExtractValues {
                input: Some(PathBuf::from("cm.yaml")),
            }
        );
    }
}
