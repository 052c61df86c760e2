//! Filesystem abstraction for the overlay inflator
//!
//! Provides lexically normalized paths, descriptor discovery, and safe I/O
//! operations used by the overlay graph walks.

pub mod constants;
pub mod copy;
pub mod error;
pub mod io;
pub mod layout;
pub mod path;

pub use constants::OverlayPath;
pub use copy::copy_tree;
pub use error::{Error, Result};
pub use layout::find_descriptor;
pub use path::NormalizedPath;
