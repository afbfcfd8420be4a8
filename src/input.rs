//! Discovery and parsing of section template files.
//!
//! A file is normally one template keyed by its stem, with an optional `NN-` ordering prefix
//! removed (`02-getting-started.md` becomes `getting-started`). A file holding two or more
//! level-1 headings is split at each of them instead, and every part is keyed by a slug of its
//! title.

use crate::content::Node;
use crate::error::{Error, Result};
use crate::formats::Format;
use crate::store::Template;
use std::path::{Path, PathBuf};
use std::{fs, io};
use streaming_iterator::StreamingIterator;
use tree_sitter::{Parser, Query, QueryCursor};

/// Collects the files to load from a mix of file and directory paths.
///
/// Directories are walked recursively and filtered by extension. Explicit file paths are kept
/// regardless of extension. The result is sorted so that file names order the sections.
///
/// # Errors
///
/// Returns an error if a directory cannot be read.
pub fn find_documents(paths: Vec<PathBuf>, extensions: &[String]) -> io::Result<Vec<PathBuf>> {
    let mut documents = Vec::new();
    for path in paths {
        if path.is_dir() {
            walk(&path, extensions, &mut documents)?;
        } else if path.is_file() {
            documents.push(path);
        } else {
            tracing::warn!(path = %path.display(), "skipping missing path");
        }
    }
    documents.sort();
    documents.dedup();
    Ok(documents)
}

fn walk(dir: &Path, extensions: &[String], out: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, extensions, out)?;
        } else if path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|want| want == ext))
        {
            out.push(path);
        }
    }
    Ok(())
}

/// Section id derived from a template file name.
#[must_use]
pub fn section_id_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();
    match stem.split_once('-') {
        Some((prefix, rest))
            if !prefix.is_empty()
                && !rest.is_empty()
                && prefix.chars().all(|c| c.is_ascii_digit()) =>
        {
            rest.to_string()
        }
        _ => stem,
    }
}

/// Lowercase, hyphen-separated identifier for a heading title.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Parses one file into its section templates.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the grammar fails to load or the format's
/// section query is invalid.
pub fn load_templates(path: &Path, format: &impl Format) -> Result<Vec<Template>> {
    let source = fs::read_to_string(path)?;
    let mut parser = Parser::new();
    parser.set_language(&format.language())?;

    let starts = section_starts(&mut parser, &source, format, path)?;
    if starts.len() < 2 {
        let root = parse_content(&mut parser, &source, format, path)?;
        return Ok(vec![Template {
            id: section_id_from_path(path),
            root,
        }]);
    }

    let mut templates = Vec::with_capacity(starts.len());
    for (i, (start, title)) in starts.iter().enumerate() {
        // Anything above the first heading belongs to the first section.
        let start = if i == 0 { 0 } else { *start };
        let end = starts.get(i + 1).map_or(source.len(), |(next, _)| *next);
        let root = parse_content(&mut parser, &source[start..end], format, path)?;
        templates.push(Template {
            id: slugify(title),
            root,
        });
    }
    tracing::debug!(path = %path.display(), sections = templates.len(), "split document");
    Ok(templates)
}

/// Byte offsets and titles of the section-opening headings in `source`.
fn section_starts(
    parser: &mut Parser,
    source: &str,
    format: &impl Format,
    path: &Path,
) -> Result<Vec<(usize, String)>> {
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| Error::Parse(path.to_path_buf()))?;
    let query = Query::new(&format.language(), format.section_query())?;
    let heading_idx = query.capture_index_for_name("heading");
    let title_idx = query.capture_index_for_name("title");

    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), source.as_bytes());
    let mut starts = Vec::new();

    while let Some(m) = matches.next() {
        let mut start = None;
        let mut title = None;
        for capture in m.captures {
            if Some(capture.index) == heading_idx {
                start = Some(capture.node.start_byte());
            } else if Some(capture.index) == title_idx {
                title = source
                    .get(capture.node.byte_range())
                    .map(|text| text.trim().to_string());
            }
        }
        if let (Some(start), Some(title)) = (start, title) {
            starts.push((start, title));
        }
    }

    starts.sort_by_key(|(start, _)| *start);
    Ok(starts)
}

fn parse_content(
    parser: &mut Parser,
    source: &str,
    format: &impl Format,
    path: &Path,
) -> Result<Node> {
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| Error::Parse(path.to_path_buf()))?;
    format.build_content(tree.root_node(), source)
}

#[cfg(test)]
#[path = "tests/input.rs"]
mod tests;
