//! Markdown format implementation using tree-sitter-md.
//!
//! The block grammar gives us headings, paragraphs, lists, quotes and code blocks, but leaves
//! inline markup as raw `inline` nodes. Each of those is parsed again with the inline grammar so
//! emphasis, code spans, escapes, links, images, autolinks and entities come out as content
//! elements or plain text, never as markup characters.

use crate::content::{Element, Node, Tag};
use crate::error::Result;
use crate::formats::Format;
use tree_sitter::Parser;

/// Tree-sitter queries and content conversion for markdown section templates.
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn language(&self) -> tree_sitter::Language {
        tree_sitter_md::LANGUAGE.into()
    }

    fn section_query(&self) -> &'static str {
        "(atx_heading (atx_h1_marker) (inline) @title) @heading"
    }

    fn build_content(&self, root: tree_sitter::Node<'_>, source: &str) -> Result<Node> {
        let mut converter = Converter::new()?;
        let children = converter.blocks(root, source);
        let mut section = Node::Element(Element::new(Tag::Section, children));
        section.normalize();
        Ok(section)
    }
}

/// Block walker holding the parser used for inline runs.
struct Converter {
    inline: Parser,
}

impl Converter {
    fn new() -> Result<Self> {
        let language: tree_sitter::Language = tree_sitter_md::INLINE_LANGUAGE.into();
        let mut inline = Parser::new();
        inline.set_language(&language)?;
        Ok(Self { inline })
    }

    /// Converts the block children of `node`, separating blocks with a newline leaf.
    fn blocks(&mut self, node: tree_sitter::Node<'_>, source: &str) -> Vec<Node> {
        let mut out = Vec::new();
        for child in children(node) {
            for block in self.block(child, source) {
                if !out.is_empty() {
                    out.push(Node::text("\n"));
                }
                out.push(block);
            }
        }
        out
    }

    fn block(&mut self, node: tree_sitter::Node<'_>, source: &str) -> Vec<Node> {
        match node.kind() {
            "document" | "section" => self.blocks(node, source),
            "atx_heading" => {
                let level = children(node)
                    .iter()
                    .find_map(|child| atx_level(child.kind()))
                    .unwrap_or(1);
                let text = children(node)
                    .into_iter()
                    .find(|child| child.kind() == "inline")
                    .map(|inline| collapse_lines(source_text(inline, source)))
                    .unwrap_or_default();
                vec![Node::element(Tag::Heading(level), self.inline_nodes(&text))]
            }
            "setext_heading" => {
                let level = if children(node)
                    .iter()
                    .any(|child| child.kind() == "setext_h2_underline")
                {
                    2
                } else {
                    1
                };
                let text = children(node)
                    .into_iter()
                    .find(|child| child.kind() == "paragraph")
                    .map(|paragraph| collapse_lines(source_text(paragraph, source)))
                    .unwrap_or_default();
                vec![Node::element(Tag::Heading(level), self.inline_nodes(&text))]
            }
            "paragraph" => {
                let text = children(node)
                    .into_iter()
                    .filter(|child| child.kind() == "inline")
                    .map(|inline| collapse_lines(source_text(inline, source)))
                    .collect::<Vec<_>>()
                    .join(" ");
                vec![Node::element(Tag::Paragraph, self.inline_nodes(&text))]
            }
            "fenced_code_block" => {
                let language = children(node)
                    .into_iter()
                    .find(|child| child.kind() == "info_string")
                    .and_then(|info| {
                        source_text(info, source)
                            .split_whitespace()
                            .next()
                            .map(str::to_string)
                    });
                let body = children(node)
                    .into_iter()
                    .find(|child| child.kind() == "code_fence_content")
                    .map(|content| source_text(content, source).trim_end_matches('\n'))
                    .unwrap_or_default()
                    .to_string();
                vec![Node::element(Tag::CodeBlock(language), vec![Node::text(body)])]
            }
            "indented_code_block" => {
                let body = source_text(node, source)
                    .lines()
                    .map(|line| line.strip_prefix("    ").unwrap_or(line.trim_start()))
                    .collect::<Vec<_>>()
                    .join("\n");
                vec![Node::element(
                    Tag::CodeBlock(None),
                    vec![Node::text(body.trim_end_matches('\n'))],
                )]
            }
            "pipe_table" => vec![Node::element(
                Tag::CodeBlock(None),
                vec![Node::text(source_text(node, source).trim_end())],
            )],
            "list" => vec![Node::element(Tag::List, self.blocks(node, source))],
            "list_item" => vec![Node::element(Tag::ListItem, self.blocks(node, source))],
            "block_quote" => vec![Node::element(Tag::BlockQuote, self.blocks(node, source))],
            "thematic_break" => vec![Node::element(Tag::Rule, Vec::new())],
            "html_block" => html_block(source_text(node, source)),
            _ => Vec::new(),
        }
    }

    /// Parses one inline run into text leaves and inline elements.
    fn inline_nodes(&mut self, text: &str) -> Vec<Node> {
        let Some(tree) = self.inline.parse(text, None) else {
            return vec![Node::text(text)];
        };
        let mut out = Vec::new();
        inline_children(tree.root_node(), text, &mut out);
        out
    }
}

fn children(node: tree_sitter::Node<'_>) -> Vec<tree_sitter::Node<'_>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

fn source_text<'a>(node: tree_sitter::Node<'_>, source: &'a str) -> &'a str {
    source.get(node.byte_range()).unwrap_or_default()
}

fn atx_level(kind: &str) -> Option<u8> {
    kind.strip_prefix("atx_h")?
        .strip_suffix("_marker")?
        .parse()
        .ok()
}

/// Appends text to `out`, extending a trailing text leaf.
fn push_text(out: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text(last)) = out.last_mut() {
        last.push_str(text);
    } else {
        out.push(Node::text(text));
    }
}

/// Converts the children of an inline node, keeping the text between them.
fn inline_children(node: tree_sitter::Node<'_>, source: &str, out: &mut Vec<Node>) {
    let mut pos = node.start_byte();
    for child in children(node) {
        push_text(out, source.get(pos..child.start_byte()).unwrap_or_default());
        inline_node(child, source, out);
        pos = child.end_byte();
    }
    push_text(out, source.get(pos..node.end_byte()).unwrap_or_default());
}

fn inline_node(node: tree_sitter::Node<'_>, source: &str, out: &mut Vec<Node>) {
    match node.kind() {
        "emphasis_delimiter" | "code_span_delimiter" | "html_tag" => {}
        "emphasis" => out.push(inline_element(Tag::Emphasis, node, source)),
        "strong_emphasis" => out.push(inline_element(Tag::Strong, node, source)),
        "code_span" => out.push(Node::element(
            Tag::Code,
            vec![Node::text(code_span_text(source_text(node, source)))],
        )),
        "backslash_escape" => {
            push_text(out, source_text(node, source).get(1..).unwrap_or_default());
        }
        "entity_reference" | "numeric_character_reference" => {
            push_text(out, &decode_entities(source_text(node, source)));
        }
        "hard_line_break" => push_text(out, " "),
        "uri_autolink" | "email_autolink" => push_text(
            out,
            source_text(node, source)
                .trim_start_matches('<')
                .trim_end_matches('>'),
        ),
        "inline_link" | "full_reference_link" | "collapsed_reference_link" | "shortcut_link" => {
            label(node, "link_text", source, out);
        }
        "image" => label(node, "image_description", source, out),
        _ => inline_children(node, source, out),
    }
}

fn inline_element(tag: Tag, node: tree_sitter::Node<'_>, source: &str) -> Node {
    let mut inner = Vec::new();
    inline_children(node, source, &mut inner);
    Node::element(tag, inner)
}

/// Keeps only the visible label of a link or image.
fn label(node: tree_sitter::Node<'_>, kind: &str, source: &str, out: &mut Vec<Node>) {
    if let Some(text) = children(node).into_iter().find(|child| child.kind() == kind) {
        inline_children(text, source, out);
    }
}

/// Code span contents without backticks or the single padding space on each side.
fn code_span_text(raw: &str) -> String {
    let inner = raw.trim_matches('`');
    inner
        .strip_prefix(' ')
        .and_then(|rest| rest.strip_suffix(' '))
        .filter(|rest| !rest.trim().is_empty())
        .unwrap_or(inner)
        .to_string()
}

fn html_block(html: &str) -> Vec<Node> {
    let trimmed = html.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("<script") {
        return vec![Node::element(Tag::Script, vec![Node::text(trimmed)])];
    }
    if lower.starts_with("<style") {
        return vec![Node::element(Tag::Style, vec![Node::text(trimmed)])];
    }
    if lower.starts_with("<!--") {
        return Vec::new();
    }

    let text = decode_entities(&strip_tags(trimmed));
    if text.is_empty() {
        Vec::new()
    } else {
        vec![Node::element(Tag::Paragraph, vec![Node::text(text)])]
    }
}

/// Text of an HTML fragment with its tags removed and whitespace collapsed.
fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Replaces named and numeric character references with the characters they stand for.
///
/// Unknown references are left as written.
fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .and_then(|end| decode_entity(&tail[1..end]).map(|c| (c, end)));
        if let Some((c, end)) = decoded {
            out.push(c);
            rest = &tail[end + 1..];
        } else {
            out.push('&');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix('x').or_else(|| number.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse().ok()?,
        };
        return char::from_u32(code);
    }
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "copy" => Some('\u{a9}'),
        "reg" => Some('\u{ae}'),
        "ndash" => Some('\u{2013}'),
        "mdash" => Some('\u{2014}'),
        "hellip" => Some('\u{2026}'),
        _ => None,
    }
}

/// Joins soft-wrapped lines with single spaces, dropping quote continuation markers.
fn collapse_lines(text: &str) -> String {
    text.lines()
        .map(|line| line.trim().trim_start_matches('>').trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "../tests/markdown.rs"]
mod tests;
