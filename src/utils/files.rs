//! File resolution for `\input` and `\include`
//!
//! The engine never touches the filesystem directly. It asks a
//! [`FileResolver`] for the content of included documents, so the same
//! code runs against the real disk (CLI) or an in-memory set of files
//! (tests, embedding).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::data::constants::{BIBLIOGRAPHY_EXTENSION, DOCUMENT_EXTENSION};

/// Trait for resolving and reading included files
///
/// Implementations:
/// - `StdFileResolver`: reads from the real filesystem (CLI)
/// - `MemoryFileResolver`: in-memory file storage (testing, embedding)
pub trait FileResolver {
    /// Read a file's full contents
    fn read_file(&self, path: &Path) -> Result<String, FileResolveError>;

    /// Resolve a path relative to the document's base directory
    fn resolve_path(&self, base: &Path, relative: &str) -> PathBuf {
        base.join(relative)
    }
}

/// Error type for file resolution
#[derive(Debug, Clone)]
pub enum FileResolveError {
    NotFound(PathBuf),
    ReadError(String),
}

impl std::fmt::Display for FileResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileResolveError::NotFound(path) => write!(f, "File not found: {}", path.display()),
            FileResolveError::ReadError(msg) => write!(f, "Read error: {}", msg),
        }
    }
}

impl std::error::Error for FileResolveError {}

/// Standard filesystem resolver (for CLI usage)
#[derive(Debug, Default)]
pub struct StdFileResolver {
    /// Extra directories tried when a file is missing next to the document
    search_paths: Vec<PathBuf>,
}

impl StdFileResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_search_path(&mut self, path: impl AsRef<Path>) {
        self.search_paths.push(path.as_ref().to_path_buf());
    }

    /// Try the resolved path first, then the same file name in each search path
    fn find_file(&self, path: &Path) -> Option<PathBuf> {
        if path.is_file() {
            return Some(path.to_path_buf());
        }

        let name = path.file_name()?;
        self.search_paths
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_file())
    }
}

impl FileResolver for StdFileResolver {
    fn read_file(&self, path: &Path) -> Result<String, FileResolveError> {
        let full_path = self
            .find_file(path)
            .ok_or_else(|| FileResolveError::NotFound(path.to_path_buf()))?;
        std::fs::read_to_string(&full_path).map_err(|e| FileResolveError::ReadError(e.to_string()))
    }
}

/// Memory-based file resolver (for testing and embedding)
#[derive(Debug, Default)]
pub struct MemoryFileResolver {
    files: HashMap<PathBuf, String>,
}

impl MemoryFileResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to the in-memory storage
    pub fn add_file(&mut self, path: impl Into<PathBuf>, content: &str) {
        self.files.insert(path.into(), content.to_string());
    }

    /// Builder-style variant of [`MemoryFileResolver::add_file`]
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: &str) -> Self {
        self.add_file(path, content);
        self
    }
}

impl FileResolver for MemoryFileResolver {
    fn read_file(&self, path: &Path) -> Result<String, FileResolveError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| FileResolveError::NotFound(path.to_path_buf()))
    }
}

/// What an inclusion argument refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncludeTarget {
    /// A `.bbl` file; bibliographies are dropped without reading anything
    Bibliography,
    /// A document to splice in, with the `.tex` extension already added
    Document(String),
}

impl IncludeTarget {
    pub fn classify(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.ends_with(BIBLIOGRAPHY_EXTENSION) {
            IncludeTarget::Bibliography
        } else if raw.ends_with(DOCUMENT_EXTENSION) {
            IncludeTarget::Document(raw.to_string())
        } else {
            IncludeTarget::Document(format!("{}{}", raw, DOCUMENT_EXTENSION))
        }
    }
}
