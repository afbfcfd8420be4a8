//! The rendered content tree of a documentation section.
//!
//! Templates are parsed once into this tree and every navigation mounts a fresh clone of it.
//! The highlighter rewrites text leaves in place and the TOC builder stamps anchors onto
//! heading elements, so the tree is deliberately plain owned data: elements with children and
//! text leaves, nothing shared.

#[derive(Clone, Debug, PartialEq, Eq)]
/// Element kinds a section template can contain.
pub enum Tag {
    /// Root wrapper around a whole section.
    Section,
    /// Heading with its level (1 for the section title).
    Heading(u8),
    /// Block of prose.
    Paragraph,
    /// Bulleted or numbered list.
    List,
    /// Single entry of a list.
    ListItem,
    /// Quoted block.
    BlockQuote,
    /// Fenced or indented code with an optional language from the info string.
    CodeBlock(Option<String>),
    /// Inline code span.
    Code,
    /// Emphasised inline run.
    Emphasis,
    /// Strongly emphasised inline run.
    Strong,
    /// Horizontal rule.
    Rule,
    /// Embedded script, never treated as content.
    Script,
    /// Embedded stylesheet, never treated as content.
    Style,
    /// Search highlight wrapped around a matching run of text.
    Mark,
}

impl Tag {
    #[must_use]
    /// Whether text under this element is readable content.
    pub fn is_content(&self) -> bool {
        !matches!(self, Self::Script | Self::Style)
    }

    #[must_use]
    /// Heading level if this is a heading.
    pub fn heading_level(&self) -> Option<u8> {
        match self {
            Self::Heading(level) => Some(*level),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// An element node owning its children.
pub struct Element {
    /// What kind of element this is.
    pub tag: Tag,
    /// Anchor identifier, assigned to headings by the TOC builder.
    pub id: Option<String>,
    /// Child nodes in document order.
    pub children: Vec<Node>,
}

impl Element {
    #[must_use]
    /// Creates an element without an anchor.
    pub fn new(tag: Tag, children: Vec<Node>) -> Self {
        Self {
            tag,
            id: None,
            children,
        }
    }

    #[must_use]
    /// Concatenated text of every leaf below this element.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.push_text(&mut out);
        }
        out
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A node in the content tree.
pub enum Node {
    /// Element with children.
    Element(Element),
    /// Text leaf.
    Text(String),
}

impl Node {
    #[must_use]
    /// Creates a text leaf.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    #[must_use]
    /// Creates an element node.
    pub fn element(tag: Tag, children: Vec<Node>) -> Self {
        Self::Element(Element::new(tag, children))
    }

    #[must_use]
    /// Borrows the element if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    #[must_use]
    /// Flattens the subtree to its text, in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Element(element) => {
                for child in &element.children {
                    child.push_text(out);
                }
            }
        }
    }

    /// Merges adjacent text leaves and drops empty ones, recursively.
    pub fn normalize(&mut self) {
        let Self::Element(element) = self else {
            return;
        };

        let mut merged: Vec<Node> = Vec::with_capacity(element.children.len());
        for mut child in element.children.drain(..) {
            child.normalize();
            if let Self::Text(text) = &child {
                if text.is_empty() {
                    continue;
                }
                if let Some(Self::Text(prev)) = merged.last_mut() {
                    prev.push_str(text);
                    continue;
                }
            }
            merged.push(child);
        }
        element.children = merged;
    }

    #[must_use]
    /// Number of elements in the subtree with the given tag.
    pub fn count_tag(&self, tag: &Tag) -> usize {
        match self {
            Self::Text(_) => 0,
            Self::Element(element) => {
                usize::from(&element.tag == tag)
                    + element
                        .children
                        .iter()
                        .map(|child| child.count_tag(tag))
                        .sum::<usize>()
            }
        }
    }

    #[must_use]
    /// Number of search highlight marks in the subtree.
    pub fn mark_count(&self) -> usize {
        self.count_tag(&Tag::Mark)
    }

    #[must_use]
    /// First element with the given tag, depth first.
    pub fn find_tag(&self, tag: &Tag) -> Option<&Element> {
        let element = self.as_element()?;
        if &element.tag == tag {
            return Some(element);
        }
        element.children.iter().find_map(|child| child.find_tag(tag))
    }

    #[must_use]
    /// Level 2 and 3 headings in document order.
    pub fn toc_headings(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        collect_toc_headings(self, &mut out);
        out
    }

    /// Mutable level 2 and 3 headings in document order.
    pub fn toc_headings_mut(&mut self) -> Vec<&mut Element> {
        let mut out = Vec::new();
        collect_toc_headings_mut(self, &mut out);
        out
    }
}

fn is_toc_heading(tag: &Tag) -> bool {
    matches!(tag.heading_level(), Some(2 | 3))
}

fn collect_toc_headings<'a>(node: &'a Node, out: &mut Vec<&'a Element>) {
    if let Node::Element(element) = node {
        if is_toc_heading(&element.tag) {
            out.push(element);
        } else {
            for child in &element.children {
                collect_toc_headings(child, out);
            }
        }
    }
}

fn collect_toc_headings_mut<'a>(node: &'a mut Node, out: &mut Vec<&'a mut Element>) {
    if let Node::Element(element) = node {
        if is_toc_heading(&element.tag) {
            out.push(element);
        } else {
            for child in &mut element.children {
                collect_toc_headings_mut(child, out);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/content.rs"]
mod tests;
