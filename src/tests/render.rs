use super::{render, CodeHighlighter, Rendered};
use crate::content::{Element, Node, Tag};
use crate::highlight::apply_highlight;
use crate::theme::Theme;
use crate::toc::build_toc;

fn line_text(rendered: &Rendered, index: usize) -> String {
    rendered.lines[index]
        .spans
        .iter()
        .map(|span| span.content.as_ref())
        .collect()
}

fn section() -> Node {
    Node::element(
        Tag::Section,
        vec![
            Node::element(Tag::Heading(1), vec![Node::text("Theming")]),
            Node::element(
                Tag::Paragraph,
                vec![Node::text("Pick a palette for reading.")],
            ),
            Node::element(Tag::Heading(2), vec![Node::text("Dark mode")]),
            Node::element(
                Tag::Paragraph,
                vec![Node::text("Dark mode is easier at night.")],
            ),
            Node::element(
                Tag::CodeBlock(None),
                vec![Node::text("vellum --theme dark\nvellum docs")],
            ),
            Node::element(Tag::Script, vec![Node::text("hidden()")]),
        ],
    )
}

#[test]
fn test_blocks_are_separated_by_blank_lines() {
    let code = CodeHighlighter::new();
    let rendered = render(&section(), 80, Theme::Light, &code);

    assert_eq!(line_text(&rendered, 0), "Theming");
    assert_eq!(line_text(&rendered, 1), "");
    assert_eq!(line_text(&rendered, 2), "Pick a palette for reading.");
    assert_eq!(line_text(&rendered, 4), "Dark mode");
}

#[test]
fn test_script_text_is_not_drawn() {
    let code = CodeHighlighter::new();
    let rendered = render(&section(), 80, Theme::Dark, &code);
    let all: String = (0..rendered.lines.len())
        .map(|i| line_text(&rendered, i))
        .collect::<Vec<_>>()
        .join("\n");
    assert!(!all.contains("hidden()"));
}

#[test]
fn test_anchors_resolve_to_heading_lines() {
    let code = CodeHighlighter::new();
    let mut root = section();
    let toc = build_toc(&mut root);
    let rendered = render(&root, 80, Theme::Light, &code);

    let line = rendered.anchor_line(&toc[0].anchor).unwrap();
    assert_eq!(line_text(&rendered, line), "Dark mode");
    assert_eq!(rendered.anchor_line("heading-9"), None);
}

#[test]
fn test_first_mark_line_is_recorded() {
    let code = CodeHighlighter::new();
    let mut root = section();
    apply_highlight(&mut root, "night");
    let rendered = render(&root, 80, Theme::Light, &code);

    let line = rendered.first_mark.unwrap();
    assert!(line_text(&rendered, line).contains("night"));

    let plain = render(&section(), 80, Theme::Light, &code);
    assert_eq!(plain.first_mark, None);
}

#[test]
fn test_code_blocks_are_recorded_for_copying() {
    let code = CodeHighlighter::new();
    let rendered = render(&section(), 80, Theme::Light, &code);

    assert_eq!(rendered.code_blocks.len(), 1);
    let block = rendered.code_block_from(0).unwrap();
    assert_eq!(block.text, "vellum --theme dark\nvellum docs");
    assert!(line_text(&rendered, block.line).contains("vellum --theme dark"));
    assert!(rendered.code_block_from(block.line + 1).is_none());
}

#[test]
fn test_highlighted_code_keeps_its_text() {
    let code = CodeHighlighter::new();
    let root = Node::Element(Element::new(
        Tag::Section,
        vec![Node::element(
            Tag::CodeBlock(Some("rust".to_string())),
            vec![Node::text("fn main() {}")],
        )],
    ));
    let rendered = render(&root, 80, Theme::Dark, &code);
    assert!(line_text(&rendered, 0).contains("fn main() {}"));
}

#[test]
fn test_long_paragraphs_wrap_at_width() {
    let code = CodeHighlighter::new();
    let words = "lorem ipsum dolor sit amet ".repeat(10);
    let root = Node::element(
        Tag::Section,
        vec![Node::element(Tag::Paragraph, vec![Node::text(words.trim())])],
    );
    let rendered = render(&root, 30, Theme::Light, &code);

    assert!(rendered.lines.len() > 1);
    for i in 0..rendered.lines.len() {
        assert!(line_text(&rendered, i).trim_end().chars().count() <= 30);
    }
}
