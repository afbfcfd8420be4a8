//! Table of contents for the displayed section.

use crate::content::Node;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Visual tier of a TOC entry.
pub enum TocLevel {
    /// Level 2 heading.
    Primary,
    /// Level 3 heading, indented under the preceding primary entry.
    Secondary,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A clickable link to a heading in the displayed section.
pub struct TocEntry {
    /// Heading text.
    pub label: String,
    /// Anchor id stamped onto the heading element.
    pub anchor: String,
    /// Indentation tier.
    pub level: TocLevel,
}

#[must_use]
/// Anchor for the heading at `index` among a section's TOC headings.
pub fn anchor_for(index: usize) -> String {
    format!("heading-{index}")
}

/// Builds the TOC of `section_root`, assigning positional anchors to its headings.
///
/// Level 2 and 3 headings are visited in document order and each receives the id
/// `heading-{n}`, so the entries can later be resolved to on-screen positions.
pub fn build_toc(section_root: &mut Node) -> Vec<TocEntry> {
    section_root
        .toc_headings_mut()
        .into_iter()
        .enumerate()
        .map(|(index, heading)| {
            let anchor = anchor_for(index);
            heading.id = Some(anchor.clone());
            let level = if heading.tag.heading_level() == Some(2) {
                TocLevel::Primary
            } else {
                TocLevel::Secondary
            };
            TocEntry {
                label: heading.text_content().trim().to_string(),
                anchor,
                level,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/toc.rs"]
mod tests;
