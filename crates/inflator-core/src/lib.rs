//! Overlay resolution and values merging for Big Bang deployments
//!
//! This crate turns a stack of Kustomize overlays that ultimately build on a
//! remote Helm chart repository into:
//!
//! - the remote reference the stack builds on ([`BaseResolver`]),
//! - one merged values document, replaying the release's `valuesFrom` order
//!   over plaintext and decrypted fragments ([`ValuesMergeEngine`]),
//! - a self-contained local copy of the stack ([`LocalMaterializer`]).
//!
//! External tools are reached through [`CommandRunner`] and remote sources
//! through [`inflator_git::SourceFetcher`]; [`Inflator`] ties it together.

pub mod collector;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod inflator;
pub mod manifest;
pub mod materialize;
pub mod merge;
pub mod reference;
pub mod release;
pub mod resolver;
pub mod runner;
pub mod tools;
pub mod values;

pub use collector::FragmentTable;
pub use config::{ConfigResolver, InflatorConfig, ToolsConfig};
pub use descriptor::Descriptor;
pub use error::{Error, Result};
pub use inflator::Inflator;
pub use materialize::LocalMaterializer;
pub use merge::deep_merge;
pub use reference::{BaseReference, LocalReference, RemoteReference};
pub use release::{FragmentKind, ReferenceOrder, ValuesReference};
pub use resolver::BaseResolver;
pub use runner::{CommandRunner, ScriptedRunner, SystemRunner, ToolCommand, ToolOutput};
pub use tools::ExternalTools;
pub use values::ValuesMergeEngine;
