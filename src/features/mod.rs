//! Feature modules - extension points around the engine
//!
//! - `registry`: user-registered commands and environments
//! - `rules`: TOML rule files loaded into a registry (feature `custom-rules`)

pub mod registry;

#[cfg(feature = "custom-rules")]
pub mod rules;

// Re-export commonly used types
pub use registry::{CommandKind, EnvironmentKind, HandlerFn, HandlerRegistry};

#[cfg(feature = "custom-rules")]
pub use rules::CustomRules;
