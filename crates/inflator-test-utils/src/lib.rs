//! Shared test utilities for the bb-inflator workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`git`]: local git repositories with tagged history
//! - [`overlay`]: [`OverlayTree`] builder for overlay directory graphs

pub mod git;
pub mod overlay;

pub use overlay::OverlayTree;
