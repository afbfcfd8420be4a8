//! Lays the displayed content tree out as styled terminal lines.
//!
//! Layout is where the tree meets the screen: heading anchors and the first search mark only get
//! line numbers here, so scrolling to a TOC entry or to a highlight is resolved against the
//! `Rendered` output rather than the tree.

use crate::content::{Element, Node, Tag};
use crate::theme::{Palette, Theme};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use std::collections::HashMap;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

/// Syntax definitions and colour themes for fenced code blocks.
pub struct CodeHighlighter {
    syntaxes: SyntaxSet,
    themes: ThemeSet,
}

impl Default for CodeHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeHighlighter {
    #[must_use]
    /// Loads syntect's bundled syntaxes and themes.
    pub fn new() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            themes: ThemeSet::load_defaults(),
        }
    }

    /// Highlights `code` as `language`, or `None` if the language or theme is unknown.
    fn highlight(
        &self,
        code: &str,
        language: &str,
        theme: Theme,
    ) -> Option<Vec<Vec<Span<'static>>>> {
        let syntax = self.syntaxes.find_syntax_by_token(language)?;
        let theme = self.themes.themes.get(theme.syntax_theme())?;
        let mut highlighter = HighlightLines::new(syntax, theme);

        let mut lines = Vec::new();
        for line in LinesWithEndings::from(code) {
            let ranges = highlighter.highlight_line(line, &self.syntaxes).ok()?;
            let spans = ranges
                .into_iter()
                .map(|(style, text)| {
                    let fg = style.foreground;
                    Span::styled(
                        text.trim_end_matches('\n').to_string(),
                        Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b)),
                    )
                })
                .collect();
            lines.push(spans);
        }
        Some(lines)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A code block's position and text, for copying.
pub struct CodeBlock {
    /// First line of the block in the rendered output.
    pub line: usize,
    /// Block text as displayed.
    pub text: String,
}

#[derive(Debug, Default)]
/// Laid-out section ready to be drawn.
pub struct Rendered {
    /// Styled lines in display order.
    pub lines: Vec<Line<'static>>,
    /// Line of each anchored heading, by anchor id.
    pub anchors: HashMap<String, usize>,
    /// Line holding the first search mark.
    pub first_mark: Option<usize>,
    /// Code blocks in display order.
    pub code_blocks: Vec<CodeBlock>,
}

impl Rendered {
    #[must_use]
    /// Line an anchor was laid out on.
    pub fn anchor_line(&self, anchor: &str) -> Option<usize> {
        self.anchors.get(anchor).copied()
    }

    #[must_use]
    /// First code block starting at or below `line`.
    pub fn code_block_from(&self, line: usize) -> Option<&CodeBlock> {
        self.code_blocks.iter().find(|block| block.line >= line)
    }
}

#[derive(Clone, Debug)]
struct Piece {
    text: String,
    style: Style,
    mark: bool,
}

/// Lays out `root` at `width` columns in the colours of `theme`.
#[must_use]
pub fn render(root: &Node, width: usize, theme: Theme, code: &CodeHighlighter) -> Rendered {
    let mut layout = Layout {
        out: Rendered::default(),
        palette: theme.palette(),
        theme,
        width: width.max(20),
        code,
    };
    if let Node::Element(element) = root {
        layout.blocks(&element.children, "", "");
    }
    layout.out
}

struct Layout<'a> {
    out: Rendered,
    palette: Palette,
    theme: Theme,
    width: usize,
    code: &'a CodeHighlighter,
}

impl Layout<'_> {
    fn blocks(&mut self, nodes: &[Node], first_prefix: &str, rest_prefix: &str) {
        let mut first = true;
        for node in nodes {
            let Node::Element(element) = node else {
                continue;
            };
            if !element.tag.is_content() {
                continue;
            }
            if !first && !matches!(element.tag, Tag::ListItem) {
                self.blank(rest_prefix);
            }
            let prefix = if first { first_prefix } else { rest_prefix };
            self.block(element, prefix, rest_prefix);
            first = false;
        }
    }

    fn blank(&mut self, prefix: &str) {
        self.out
            .lines
            .push(Line::from(Span::styled(prefix.trim_end().to_string(), self.palette.quote)));
    }

    fn block(&mut self, element: &Element, first_prefix: &str, rest_prefix: &str) {
        match &element.tag {
            Tag::Heading(level) => {
                if let Some(anchor) = &element.id {
                    self.out.anchors.insert(anchor.clone(), self.out.lines.len());
                }
                let style = match level {
                    1 => self.palette.title,
                    2 => self.palette.heading,
                    _ => self.palette.subheading,
                };
                let pieces = self.inline(&element.children, style);
                self.wrap(&pieces, first_prefix, rest_prefix);
            }
            Tag::Paragraph => {
                let pieces = self.inline(&element.children, self.palette.text);
                self.wrap(&pieces, first_prefix, rest_prefix);
            }
            Tag::List => {
                for item in &element.children {
                    if let Node::Element(item) = item {
                        let bullet = format!("{rest_prefix}• ");
                        let indent = format!("{rest_prefix}  ");
                        self.blocks(&item.children, &bullet, &indent);
                    }
                }
            }
            Tag::ListItem => {
                let bullet = format!("{first_prefix}• ");
                let indent = format!("{rest_prefix}  ");
                self.blocks(&element.children, &bullet, &indent);
            }
            Tag::BlockQuote => {
                let first = format!("{first_prefix}│ ");
                let rest = format!("{rest_prefix}│ ");
                self.blocks(&element.children, &first, &rest);
            }
            Tag::CodeBlock(language) => self.code_block(element, language.as_deref(), rest_prefix),
            Tag::Rule => {
                let rule = "─".repeat(self.width.saturating_sub(rest_prefix.chars().count()));
                self.out.lines.push(Line::from(vec![
                    Span::raw(rest_prefix.to_string()),
                    Span::styled(rule, self.palette.quote),
                ]));
            }
            Tag::Section => self.blocks(&element.children, first_prefix, rest_prefix),
            // Inline elements at block level are laid out as a paragraph.
            Tag::Code | Tag::Emphasis | Tag::Strong | Tag::Mark => {
                let node = Node::Element(element.clone());
                let pieces = self.inline(std::slice::from_ref(&node), self.palette.text);
                self.wrap(&pieces, first_prefix, rest_prefix);
            }
            Tag::Script | Tag::Style => {}
        }
    }

    fn code_block(&mut self, element: &Element, language: Option<&str>, prefix: &str) {
        let text = element.text_content();
        let start = self.out.lines.len();
        self.out.code_blocks.push(CodeBlock {
            line: start,
            text: text.clone(),
        });

        let has_marks = element.children.iter().any(|child| child.mark_count() > 0);
        let highlighted = if has_marks {
            None
        } else {
            language.and_then(|language| self.code.highlight(&text, language, self.theme))
        };

        let lines: Vec<Vec<Piece>> = match highlighted {
            Some(lines) => lines
                .into_iter()
                .map(|spans| {
                    spans
                        .into_iter()
                        .map(|span| Piece {
                            text: span.content.into_owned(),
                            style: span.style,
                            mark: false,
                        })
                        .collect()
                })
                .collect(),
            None => split_lines(self.inline(&element.children, self.palette.code)),
        };

        let code_prefix = format!("{prefix}  ");
        for pieces in lines {
            self.push_line(&code_prefix, pieces);
        }
    }

    /// Flattens inline children into styled pieces.
    fn inline(&self, nodes: &[Node], base: Style) -> Vec<Piece> {
        let mut pieces = Vec::new();
        self.collect_inline(nodes, base, false, &mut pieces);
        pieces
    }

    fn collect_inline(&self, nodes: &[Node], style: Style, mark: bool, out: &mut Vec<Piece>) {
        for node in nodes {
            match node {
                Node::Text(text) => out.push(Piece {
                    text: text.clone(),
                    style,
                    mark,
                }),
                Node::Element(element) => {
                    let (style, mark) = match element.tag {
                        Tag::Mark => (self.palette.mark, true),
                        Tag::Code => (style.patch(self.palette.code), mark),
                        Tag::Strong => (style.add_modifier(Modifier::BOLD), mark),
                        Tag::Emphasis => (style.add_modifier(Modifier::ITALIC), mark),
                        Tag::Script | Tag::Style => continue,
                        _ => (style, mark),
                    };
                    self.collect_inline(&element.children, style, mark, out);
                }
            }
        }
    }

    /// Greedy word wrap of `pieces` into lines of at most `width` columns.
    fn wrap(&mut self, pieces: &[Piece], first_prefix: &str, rest_prefix: &str) {
        let mut prefix = first_prefix;
        let mut line: Vec<Piece> = Vec::new();
        let mut used = 0;

        for piece in pieces {
            for token in piece.text.split_inclusive(' ') {
                let avail = self.width.saturating_sub(prefix.chars().count());
                let visible = token.trim_end().chars().count();
                let mut token = token;
                if used > 0 && used + visible > avail {
                    self.push_line(prefix, std::mem::take(&mut line));
                    prefix = rest_prefix;
                    used = 0;
                    token = token.trim_start();
                    if token.is_empty() {
                        continue;
                    }
                }
                used += token.chars().count();
                push_piece(&mut line, token, piece);
            }
        }
        if !line.is_empty() || used == 0 {
            self.push_line(prefix, line);
        }
    }

    fn push_line(&mut self, prefix: &str, pieces: Vec<Piece>) {
        let index = self.out.lines.len();
        if self.out.first_mark.is_none() && pieces.iter().any(|piece| piece.mark) {
            self.out.first_mark = Some(index);
        }
        let mut spans = Vec::with_capacity(pieces.len() + 1);
        if !prefix.is_empty() {
            spans.push(Span::styled(prefix.to_string(), self.palette.quote));
        }
        spans.extend(
            pieces
                .into_iter()
                .map(|piece| Span::styled(piece.text, piece.style)),
        );
        self.out.lines.push(Line::from(spans));
    }
}

fn push_piece(line: &mut Vec<Piece>, token: &str, piece: &Piece) {
    if let Some(last) = line.last_mut() {
        if last.style == piece.style && last.mark == piece.mark {
            last.text.push_str(token);
            return;
        }
    }
    line.push(Piece {
        text: token.to_string(),
        style: piece.style,
        mark: piece.mark,
    });
}

/// Splits pieces at newlines, keeping styles.
fn split_lines(pieces: Vec<Piece>) -> Vec<Vec<Piece>> {
    let mut lines = vec![Vec::new()];
    for piece in pieces {
        for (i, part) in piece.text.split('\n').enumerate() {
            if i > 0 {
                lines.push(Vec::new());
            }
            if !part.is_empty() {
                if let Some(line) = lines.last_mut() {
                    push_piece(line, part, &piece);
                }
            }
        }
    }
    lines
}

#[cfg(test)]
#[path = "tests/render.rs"]
mod tests;
