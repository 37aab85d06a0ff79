//! Utility modules
//!
//! This module contains utilities and helpers:
//! - Error types and result types
//! - File resolution for multi-file documents
//! - Report files written after a run

pub mod error;
pub mod files;
pub mod report;

// Re-export commonly used items
pub use error::{ConversionResult, ConversionWarning, GrammafyError, GrammafyOutput};
pub use files::{FileResolveError, FileResolver, IncludeTarget, MemoryFileResolver, StdFileResolver};
pub use report::{format_unknowns, OutputPaths};
