//! Linear substring search over every loaded section.
//!
//! There is no index. The corpus is a handful of sections fixed at startup, so each keystroke
//! rescans every section's flattened text. Results keep the content store's order.

use crate::highlight::{literal_pattern, split_matches, MarkedText, Segment};
use crate::section::{Heading, Section};

/// Characters of context kept before the first match.
pub const SNIPPET_LEAD: usize = 50;
/// Characters kept after the start of the first match, beyond the match itself.
pub const SNIPPET_TAIL: usize = 150;
/// Heading tags shown per result.
pub const MAX_HEADING_TAGS: usize = 2;

const ELLIPSIS: &str = "...";

#[derive(Clone, Debug, PartialEq, Eq)]
/// One section that contains the query.
pub struct SearchResult {
    /// Section to navigate to when the result is opened.
    pub section_id: String,
    /// Section title as authored.
    pub title: String,
    /// Context around the first match, with matches marked.
    pub snippet: MarkedText,
    /// Headings containing the query, in section order.
    pub matching_headings: Vec<Heading>,
}

impl SearchResult {
    /// Headings the result list has room for.
    pub fn heading_tags(&self) -> impl Iterator<Item = &Heading> {
        self.matching_headings.iter().take(MAX_HEADING_TAGS)
    }
}

/// Lowercases and trims raw search box input into a query.
#[must_use]
pub fn normalize_query(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Finds every section whose text contains `query`.
///
/// The query is expected lowercased and trimmed. An empty query means search is inactive and
/// yields nothing.
#[must_use]
pub fn search(corpus: &[Section], query: &str) -> Vec<SearchResult> {
    if query.is_empty() {
        return Vec::new();
    }

    let results: Vec<SearchResult> = corpus
        .iter()
        .filter(|section| section.raw_text.contains(query))
        .map(|section| SearchResult {
            section_id: section.id.clone(),
            title: section.title.clone(),
            snippet: snippet(&section.raw_text, query).unwrap_or_default(),
            matching_headings: matching_headings(&section.headings, query),
        })
        .collect();

    tracing::debug!(query, results = results.len(), "search");
    results
}

/// Headings whose text contains `query`, ignoring case.
#[must_use]
pub fn matching_headings(headings: &[Heading], query: &str) -> Vec<Heading> {
    let query = query.to_lowercase();
    headings
        .iter()
        .filter(|heading| heading.text.to_lowercase().contains(&query))
        .cloned()
        .collect()
}

/// Extracts the text around the first occurrence of `query` with every match marked.
///
/// The window opens [`SNIPPET_LEAD`] characters before the match and closes
/// [`SNIPPET_TAIL`] characters past the end of the match, clamped to the content. Ellipses
/// flag a clamped side and are never marked themselves.
#[must_use]
pub fn snippet(content: &str, query: &str) -> Option<MarkedText> {
    let pattern = literal_pattern(query)?;
    let found = pattern.find(content)?;

    let char_len = content.chars().count();
    let match_start = content[..found.start()].chars().count();
    let match_len = found.as_str().chars().count();

    let start = match_start.saturating_sub(SNIPPET_LEAD);
    let end = (match_start + match_len + SNIPPET_TAIL).min(char_len);

    let window: String = content.chars().skip(start).take(end - start).collect();
    let body = window.trim();

    let mut segments = Vec::new();
    if start > 0 {
        segments.push(Segment::Plain(ELLIPSIS.to_string()));
    }
    segments.extend(split_matches(body, &pattern));
    if end < char_len {
        segments.push(Segment::Plain(ELLIPSIS.to_string()));
    }

    Some(MarkedText { segments })
}

#[cfg(test)]
#[path = "tests/search.rs"]
mod tests;
