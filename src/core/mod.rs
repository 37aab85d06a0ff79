//! Core conversion modules
//!
//! - `buffer`: cursor buffers and the buffer stack
//! - `output`: the output accumulator
//! - `context`: options and the per-run processing context
//! - `engine`: the scan loop and the `Grammafier` entry points
//! - `commands` / `environment`: built-in handlers and dispatch
//! - `postprocess`: normalization of the assembled text

pub mod buffer;
pub mod commands;
pub mod context;
pub mod engine;
pub mod environment;
pub mod output;
pub mod postprocess;
pub mod utils;

// Re-export main types and functions
pub use buffer::{BufferOrigin, BufferStack, CursorBuffer, Delimiter};
pub use commands::SpecialCommand;
pub use context::{GrammafyOptions, ProcessingContext};
pub use engine::Grammafier;
pub use output::OutputAccumulator;
pub use postprocess::post_process;
