//! Format trait and implementations for different document types.
//!
//! A format supplies the tree-sitter grammar for its files, a query locating the headings that
//! split a multi-section document into templates, and the conversion from the syntax tree into
//! the content tree that gets displayed, searched and highlighted.

pub mod markdown;

use crate::content::Node;
use crate::error::Result;

/// Grammar, queries and content conversion for one document format.
pub trait Format {
    /// Grammar used to parse files of this format.
    fn language(&self) -> tree_sitter::Language;
    /// Query capturing each section-opening heading as `@heading` and its text as `@title`.
    fn section_query(&self) -> &str;
    /// Converts a parsed syntax tree into a section content tree.
    ///
    /// # Errors
    ///
    /// Returns an error if a secondary grammar needed for the conversion cannot be loaded.
    fn build_content(&self, root: tree_sitter::Node<'_>, source: &str) -> Result<Node>;
}
