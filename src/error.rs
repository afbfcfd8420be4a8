//! Error type shared by the library and the binary.
//!
//! Most failures in a documentation browser are recoverable: a missing section leaves the
//! current view in place, a broken clipboard just skips the confirmation. Only loading the
//! content directory and parsing it can stop the program from starting.

use std::io;
use std::path::PathBuf;

/// Result alias used throughout vellum.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
/// Failures surfaced by loading, navigating and persisting.
pub enum Error {
    /// Reading templates, configuration or storage from disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The tree-sitter grammar could not be loaded into the parser.
    #[error("failed to load grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),
    /// A format's tree-sitter query did not compile.
    #[error("invalid query: {0}")]
    Query(#[from] tree_sitter::QueryError),
    /// Parsing produced no syntax tree for a template file.
    #[error("could not parse {}", .0.display())]
    Parse(PathBuf),
    /// The persisted key-value store could not be (de)serialised.
    #[error("storage error: {0}")]
    Storage(#[from] serde_json::Error),
    /// Navigation asked for a section with no template.
    #[error("section not found: {0}")]
    SectionNotFound(String),
    /// The content directory yielded no section templates.
    #[error("no section templates found")]
    NoSections,
}
