//! Tool configuration
//!
//! Settings are layered: a user-wide file, a project file next to where the
//! tool runs, then an explicitly named file. Later layers override earlier
//! ones key by key.

pub mod resolver;
pub mod settings;

pub use resolver::ConfigResolver;
pub use settings::{InflatorConfig, ToolsConfig};
