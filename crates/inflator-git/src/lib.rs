//! Remote source fetching for the overlay inflator
//!
//! The overlay graph bottoms out in a git repository pinned to a revision.
//! This crate hides how that repository reaches local disk behind the
//! [`SourceFetcher`] trait so the resolution and materialization logic can be
//! exercised without network access.

pub mod error;
pub mod fetch;

pub use error::{Error, Result};
pub use fetch::{GitFetcher, SourceFetcher, checkout_revision};
