use super::MarkdownFormat;
use crate::content::{Node, Tag};
use crate::formats::Format;
use crate::search::search;
use crate::section::Section;
use tree_sitter::Parser;

fn build(source: &str) -> Node {
    let format = MarkdownFormat;
    let mut parser = Parser::new();
    parser.set_language(&format.language()).unwrap();
    let tree = parser.parse(source, None).unwrap();
    format.build_content(tree.root_node(), source).unwrap()
}

fn paragraph_text(source: &str) -> String {
    build(source).find_tag(&Tag::Paragraph).unwrap().text_content()
}

#[test]
fn test_headings_and_paragraphs() {
    let root = build("# Theming\n\nSwitch between light and dark.\n\n## Toggle\n\nPress t.\n");

    let title = root.find_tag(&Tag::Heading(1)).unwrap();
    assert_eq!(title.text_content(), "Theming");

    let headings: Vec<String> = root
        .toc_headings()
        .into_iter()
        .map(|heading| heading.text_content())
        .collect();
    assert_eq!(headings, vec!["Toggle"]);

    let paragraph = root.find_tag(&Tag::Paragraph).unwrap();
    assert_eq!(paragraph.text_content(), "Switch between light and dark.");
}

#[test]
fn test_fenced_code_keeps_language_and_body() {
    let root = build("# Code\n\n```rust\nfn main() {}\n```\n");
    let code = root
        .find_tag(&Tag::CodeBlock(Some("rust".to_string())))
        .unwrap();
    assert_eq!(code.text_content(), "fn main() {}");
}

#[test]
fn test_inline_markup_becomes_elements() {
    let root = build("Use `vellum docs` for **bold** and *soft* text.\n");
    assert_eq!(root.count_tag(&Tag::Code), 1);
    assert_eq!(root.count_tag(&Tag::Strong), 1);
    assert_eq!(root.count_tag(&Tag::Emphasis), 1);

    let paragraph = root.find_tag(&Tag::Paragraph).unwrap();
    assert_eq!(paragraph.text_content(), "Use vellum docs for bold and soft text.");
}

#[test]
fn test_links_keep_their_label() {
    let root = build("See [the guide](https://example.com/guide) first.\n");
    let paragraph = root.find_tag(&Tag::Paragraph).unwrap();
    assert_eq!(paragraph.text_content(), "See the guide first.");
}

#[test]
fn test_soft_wrapped_lines_join_with_spaces() {
    let root = build("First line\nsecond line.\n");
    let paragraph = root.find_tag(&Tag::Paragraph).unwrap();
    assert_eq!(paragraph.text_content(), "First line second line.");
}

#[test]
fn test_lists_and_items() {
    let root = build("- one\n- two\n- three\n");
    assert_eq!(root.count_tag(&Tag::List), 1);
    assert_eq!(root.count_tag(&Tag::ListItem), 3);
}

#[test]
fn test_tree_is_normalized() {
    let mut root = build("# A\n\nB\n\n## C\n");
    let before = root.clone();
    root.normalize();
    assert_eq!(root, before);
}

#[test]
fn test_underscore_emphasis_drops_delimiters() {
    let root = build("Take _care_ and __note__ this.\n");
    assert_eq!(root.count_tag(&Tag::Emphasis), 1);
    assert_eq!(root.count_tag(&Tag::Strong), 1);
    assert_eq!(
        root.find_tag(&Tag::Paragraph).unwrap().text_content(),
        "Take care and note this."
    );
}

#[test]
fn test_backslash_escapes_keep_the_escaped_character() {
    assert_eq!(paragraph_text("Use \\*stars\\* here.\n"), "Use *stars* here.");
}

#[test]
fn test_images_keep_their_alt_text() {
    assert_eq!(paragraph_text("See ![logo](a.png) above.\n"), "See logo above.");
}

#[test]
fn test_entities_are_decoded() {
    assert_eq!(
        paragraph_text("Salt &amp; pepper &#8212; &#x41;&lt;b&gt;.\n"),
        "Salt & pepper \u{2014} A<b>."
    );
}

#[test]
fn test_autolinks_keep_their_address() {
    assert_eq!(paragraph_text("Visit <https://x.io> now.\n"), "Visit https://x.io now.");
}

#[test]
fn test_html_blocks_keep_only_their_text() {
    let root = build("<div class=\"note\">\n  Tip &amp; trick\n</div>\n");
    assert_eq!(root.text_content(), "Tip & trick");
    assert_eq!(root.count_tag(&Tag::Paragraph), 1);
}

#[test]
fn test_html_comments_are_dropped() {
    let root = build("<!-- hidden note -->\n\nShown.\n");
    assert_eq!(root.text_content(), "Shown.");
}

#[test]
fn test_markup_never_reaches_search_text() {
    let root = build(concat!(
        "# Care\n\n",
        "Use _care_ and \\*stars\\* plus ![logo](a.png) &amp; <https://x.io>.\n\n",
        "<div class=\"note\">Tip</div>\n",
    ));
    let paragraph = root.find_tag(&Tag::Paragraph).unwrap();
    assert_eq!(
        paragraph.text_content(),
        "Use care and *stars* plus logo & https://x.io."
    );

    let section = Section::extract("care", &root);
    assert!(section.raw_text.contains("tip"));
    assert!(!section.raw_text.contains("_care_"));
    assert!(!section.raw_text.contains('<'));
    assert!(!section.raw_text.contains("![logo]"));
    assert!(search(&[section.clone()], "div").is_empty());
    assert!(search(&[section], "&amp;").is_empty());
}

#[test]
fn test_script_blocks_keep_raw_text() {
    let root = build("<script>run(1 < 2)</script>\n");
    let script = root.find_tag(&Tag::Script).unwrap();
    assert_eq!(script.text_content(), "<script>run(1 < 2)</script>");
    assert_eq!(root.count_tag(&Tag::Paragraph), 0);
}
