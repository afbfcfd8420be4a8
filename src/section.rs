//! Plain-data view of a section template.
//!
//! Search never looks at the rendered tree. Each template is flattened once at load time into a
//! `Section`: its id, title, lowercased text and the ordered list of headings that can show up
//! as search result tags.

use crate::content::Node;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Heading levels that take part in search tags and the table of contents.
pub enum HeadingLevel {
    /// Second-level heading.
    H2,
    /// Third-level heading.
    H3,
}

impl HeadingLevel {
    #[must_use]
    /// Maps a numeric heading level, keeping only levels 2 and 3.
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            2 => Some(Self::H2),
            3 => Some(Self::H3),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A heading inside a section body.
pub struct Heading {
    /// Heading text as authored.
    pub text: String,
    /// Heading depth.
    pub level: HeadingLevel,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Immutable searchable record extracted from one section template.
pub struct Section {
    /// Unique key used for navigation and location fragments.
    pub id: String,
    /// First level-1 heading, or the id when the template has none.
    pub title: String,
    /// Flattened body text, lowercased.
    pub raw_text: String,
    /// Level 2 and 3 headings in document order.
    pub headings: Vec<Heading>,
}

impl Section {
    #[must_use]
    /// Flattens a template tree into a section record.
    pub fn extract(id: &str, root: &Node) -> Self {
        let title = root
            .find_tag(&crate::content::Tag::Heading(1))
            .map(|h1| h1.text_content().trim().to_string())
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| id.to_string());

        let headings = root
            .toc_headings()
            .into_iter()
            .filter_map(|heading| {
                let level = HeadingLevel::from_level(heading.tag.heading_level()?)?;
                Some(Heading {
                    text: heading.text_content(),
                    level,
                })
            })
            .collect();

        Self {
            id: id.to_string(),
            title,
            raw_text: root.text_content().to_lowercase(),
            headings,
        }
    }
}
