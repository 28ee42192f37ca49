use super::*;
use pretty_assertions::assert_eq;
use crate::nodes::{NodeValue, TextStyle};

#[test]
fn basic() {
    html(
        concat!(
            "My **document**.\n",
            "\n",
            "It's mine.\n",
            "\n",
            "> Yes.\n",
            "\n",
            "## Hi!\n",
            "\n",
            "Okay.\n"
        ),
        concat!(
            "<p>My <strong>document</strong>.</p>\n",
            "<p>It's mine.</p>\n",
            "<blockquote>\n",
            "<p>Yes.</p>\n",
            "</blockquote>\n",
            "<h2 id=\"hi\">Hi!</h2>\n",
            "<p>Okay.</p>\n"
        ),
    );
}

#[test]
fn empty_input_yields_empty_document() {
    let doc = parse("");
    assert!(matches!(doc.value, NodeValue::Document));
    assert!(doc.children.is_empty());
    assert!(!doc.open);

    html("", "");
}

#[test]
fn missing_trailing_newline_is_irrelevant() {
    assert_eq!(parse("# Hello"), parse("# Hello\n"));
    assert_eq!(parse("a\n\nb"), parse("a\n\nb\n"));
}

#[test]
fn atx_heading() {
    html(
        concat!("# h1\n", "foo\n", "## h2\n"),
        concat!(
            "<h1 id=\"h1\">h1</h1>\n",
            "<p>foo</p>\n",
            "<h2 id=\"h2\">h2</h2>\n"
        ),
    );
}

#[test]
fn heading_levels_stay_within_bounds() {
    for level in 1..=6usize {
        let input = format!("{} x\n", "#".repeat(level));
        let doc = parse(&input);
        match doc.children[0].value {
            NodeValue::Heading(ref nh) => {
                assert_eq!(nh.level as usize, level);
                assert!((1..=6).contains(&nh.level));
            }
            ref other => panic!("expected heading, got {:?}", other),
        }
    }

    // Seven hashes are a paragraph.
    html("####### x\n", "<p>####### x</p>\n");
}

#[test]
fn heading_needs_space_after_hashes() {
    html("#hello\n", "<p>#hello</p>\n");
}

#[test]
fn trailing_hashes_are_trimmed() {
    html("## Hi ##\n", "<h2 id=\"hi\">Hi</h2>\n");
}

#[test]
fn thematic_breaks() {
    html(
        concat!("---\n", "\n", "- - -\n", "\n", "_________\n"),
        concat!("<hr />\n", "<hr />\n", "<hr />\n"),
    );
}

#[test]
fn two_markers_are_not_a_thematic_break() {
    html("--\n", "<p>--</p>\n");
}

#[test]
fn paragraph_joins_lines_with_a_space() {
    html("one\ntwo\nthree\n", "<p>one two three</p>\n");
}

#[test]
fn hard_break_on_two_trailing_spaces() {
    html("one  \ntwo\n", "<p>one<br />\ntwo</p>\n");
}

#[test]
fn blank_lines_separate_paragraphs() {
    let doc = parse("a\n\n\nb\n");
    let paragraphs = doc
        .children
        .iter()
        .filter(|c| matches!(c.value, NodeValue::Paragraph))
        .count();
    assert_eq!(paragraphs, 2);
}

#[test]
fn leading_indent_up_to_three_is_ignored() {
    html("   a\n", "<p>a</p>\n");
}

#[test]
fn closed_leaves_carry_inlines() {
    let doc = parse("hello *world*\n");
    let para = &doc.children[0];
    assert!(!para.open);
    assert!(!para.inlines.is_empty());
    match para.inlines[1] {
        crate::nodes::Inline::Text(ref t) => {
            assert_eq!(t.text, "world");
            assert!(t.style.italic);
            assert_eq!(
                TextStyle {
                    italic: false,
                    ..t.style
                },
                TextStyle::default()
            );
        }
        ref other => panic!("expected italic text, got {:?}", other),
    }
}

#[test]
fn heading_text_is_copied_by_value() {
    let doc = parse("# A *b* c\n");
    match doc.children[0].value {
        NodeValue::Heading(ref nh) => assert_eq!(nh.text, "A b c"),
        ref other => panic!("expected heading, got {:?}", other),
    }
}
