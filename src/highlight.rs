//! Search highlighting over the displayed content tree.
//!
//! Matching is literal and case-insensitive: the query is regex-escaped and compiled with
//! case folding, so offsets always come from the original text and never from a lowercased
//! copy whose byte lengths could differ.
//!
//! Marking splits a text leaf into plain leaves and `Mark` elements. Clearing turns each mark
//! back into a text leaf and normalizes, which merges the pieces into the original leaf again.

use crate::content::{Element, Node, Tag};
use regex::{Regex, RegexBuilder};

/// Builds a case-insensitive matcher for the literal query.
///
/// Returns `None` for an empty query.
#[must_use]
pub fn literal_pattern(query: &str) -> Option<Regex> {
    if query.is_empty() {
        return None;
    }
    RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
        .ok()
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A run of text that either matched the query or did not.
pub enum Segment {
    /// Unmatched text.
    Plain(String),
    /// Text matching the query, as it appeared in the source.
    Match(String),
}

impl Segment {
    #[must_use]
    /// The segment's text regardless of kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Plain(text) | Self::Match(text) => text,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Text with every occurrence of a query wrapped as a match segment.
pub struct MarkedText {
    /// Segments in order; concatenated they give back the input text.
    pub segments: Vec<Segment>,
}

impl MarkedText {
    #[must_use]
    /// Marks every case-insensitive occurrence of `query` in `text`.
    pub fn highlight(text: &str, query: &str) -> Self {
        match literal_pattern(query) {
            Some(pattern) => Self {
                segments: split_matches(text, &pattern),
            },
            None => Self::plain_text(text),
        }
    }

    #[must_use]
    /// Wraps text that carries no matches.
    pub fn plain_text(text: &str) -> Self {
        let segments = if text.is_empty() {
            Vec::new()
        } else {
            vec![Segment::Plain(text.to_string())]
        };
        Self { segments }
    }

    #[must_use]
    /// The text with markers removed.
    pub fn plain(&self) -> String {
        self.segments.iter().map(Segment::as_str).collect()
    }
}

/// Splits `text` around every match of `pattern`, keeping all characters in order.
#[must_use]
pub fn split_matches(text: &str, pattern: &Regex) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;
    for found in pattern.find_iter(text) {
        if found.start() > last {
            segments.push(Segment::Plain(text[last..found.start()].to_string()));
        }
        segments.push(Segment::Match(found.as_str().to_string()));
        last = found.end();
    }
    if last < text.len() {
        segments.push(Segment::Plain(text[last..].to_string()));
    }
    segments
}

/// Wraps every match of `query` in the text leaves under `root` with a `Mark` element.
///
/// Leaves under script, style or an existing mark are left alone. Returns the number of marks
/// created; an empty query creates none and leaves the tree untouched.
pub fn apply_highlight(root: &mut Node, query: &str) -> usize {
    let Some(pattern) = literal_pattern(query) else {
        return 0;
    };
    let Node::Element(element) = root else {
        return 0;
    };

    let mut marks = 0;
    mark_element(element, &pattern, &mut marks);
    tracing::debug!(query, marks, "applied highlight");
    marks
}

fn mark_element(element: &mut Element, pattern: &Regex, marks: &mut usize) {
    if !element.tag.is_content() || element.tag == Tag::Mark {
        return;
    }

    let mut rewritten = Vec::with_capacity(element.children.len());
    for child in element.children.drain(..) {
        match child {
            Node::Text(text) => {
                if !pattern.is_match(&text) {
                    rewritten.push(Node::Text(text));
                    continue;
                }
                for segment in split_matches(&text, pattern) {
                    match segment {
                        Segment::Plain(plain) => rewritten.push(Node::Text(plain)),
                        Segment::Match(matched) => {
                            *marks += 1;
                            rewritten.push(Node::element(Tag::Mark, vec![Node::Text(matched)]));
                        }
                    }
                }
            }
            Node::Element(mut inner) => {
                mark_element(&mut inner, pattern, marks);
                rewritten.push(Node::Element(inner));
            }
        }
    }
    element.children = rewritten;
}

/// Unwraps every mark under `root` and merges the resulting adjacent text leaves.
///
/// Returns the number of marks removed. With no marks present the tree is not touched.
pub fn clear_highlight(root: &mut Node) -> usize {
    let Node::Element(element) = root else {
        return 0;
    };

    let removed = unwrap_marks(element);
    if removed > 0 {
        root.normalize();
        tracing::debug!(removed, "cleared highlight");
    }
    removed
}

fn unwrap_marks(element: &mut Element) -> usize {
    let mut removed = 0;
    for child in &mut element.children {
        if let Node::Element(inner) = child {
            if inner.tag == Tag::Mark {
                *child = Node::Text(inner.text_content());
                removed += 1;
            } else {
                removed += unwrap_marks(inner);
            }
        }
    }
    removed
}

#[cfg(test)]
#[path = "tests/highlight.rs"]
mod tests;
