use super::*;
use pretty_assertions::assert_eq;
use crate::nodes::NodeValue;

#[test]
fn basic() {
    html(
        "> Yes.\n",
        concat!("<blockquote>\n", "<p>Yes.</p>\n", "</blockquote>\n"),
    );
}

#[test]
fn lazy_continuation() {
    html(
        "> line one\nline two\n",
        concat!(
            "<blockquote>\n",
            "<p>line one line two</p>\n",
            "</blockquote>\n"
        ),
    );
}

#[test]
fn lazy_continuation_stops_at_structure() {
    html(
        "> quoted\n# heading\n",
        concat!(
            "<blockquote>\n",
            "<p>quoted</p>\n",
            "</blockquote>\n",
            "<h1 id=\"heading\">heading</h1>\n"
        ),
    );
}

#[test]
fn blank_marker_line_splits_paragraphs() {
    html(
        "> a\n>\n> b\n",
        concat!(
            "<blockquote>\n",
            "<p>a</p>\n",
            "<p>b</p>\n",
            "</blockquote>\n"
        ),
    );
}

#[test]
fn nested_quotes() {
    html(
        "> > deep\n",
        concat!(
            "<blockquote>\n",
            "<blockquote>\n",
            "<p>deep</p>\n",
            "</blockquote>\n",
            "</blockquote>\n"
        ),
    );
}

#[test]
fn quote_holds_other_blocks() {
    html(
        "> # title\n> body\n",
        concat!(
            "<blockquote>\n",
            "<h1 id=\"title\">title</h1>\n",
            "<p>body</p>\n",
            "</blockquote>\n"
        ),
    );
}

#[test]
fn marker_at_column_four_is_a_paragraph() {
    let doc = parse("    > not a quote\n");
    assert!(matches!(doc.children[0].value, NodeValue::Paragraph));
}

#[test]
fn up_to_three_spaces_still_a_quote() {
    let doc = parse("   > quoted\n");
    assert!(matches!(doc.children[0].value, NodeValue::Quote));
}

#[test]
fn blank_line_closes_the_quote() {
    let doc = parse("> a\n\n> b\n");
    let quotes = doc
        .children
        .iter()
        .filter(|c| matches!(c.value, NodeValue::Quote))
        .count();
    assert_eq!(quotes, 2);
}

#[test]
fn code_fence_inside_quote() {
    html(
        "> ```\n> code\n> ```\n",
        concat!(
            "<blockquote>\n",
            "<pre><code>code\n",
            "</code></pre>\n",
            "</blockquote>\n"
        ),
    );
}
