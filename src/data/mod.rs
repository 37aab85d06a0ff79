//! Data layer - static tables and constants
//!
//! - Marker characters, placeholder and bullet text
//! - Built-in void/active command tables and environment tables

pub mod constants;
pub mod tables;

// Re-export commonly used items
pub use constants::{BULLET, PLACEHOLDER};
pub use tables::{
    BUILTIN_COMMANDS, BUILTIN_ENVIRONMENTS, BUILTIN_TRANSPARENT_ENVIRONMENTS,
    BUILTIN_VOID_COMMANDS, SPECIAL_COMMANDS,
};
