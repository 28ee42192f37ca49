use super::*;
use pretty_assertions::assert_eq;
use crate::nodes::Inline;

#[test]
fn emphasis() {
    html("*i*\n", "<p><em>i</em></p>\n");
    html("_i_\n", "<p><em>i</em></p>\n");
    html("**b**\n", "<p><strong>b</strong></p>\n");
    html("__b__\n", "<p><strong>b</strong></p>\n");
    html("***bi***\n", "<p><strong><em>bi</em></strong></p>\n");
}

#[test]
fn strikethrough() {
    html("~~gone~~\n", "<p><del>gone</del></p>\n");
    html("~gone~\n", "<p><del>gone</del></p>\n");
}

#[test]
fn intraword_underscores_are_literal() {
    html("snake_case_name\n", "<p>snake_case_name</p>\n");
}

#[test]
fn leading_underscore_emphasizes() {
    html("_lead_ tail\n", "<p><em>lead</em> tail</p>\n");
}

#[test]
fn code_spans_collapse_whitespace() {
    html("`a  b`\n", "<p><code>a b</code></p>\n");
    html("`a\nb`\n", "<p><code>a b</code></p>\n");
}

#[test]
fn unterminated_code_span_is_a_literal_backtick() {
    html("`a\n", "<p>`a</p>\n");
}

#[test]
fn links() {
    html("[x](https://y)\n", "<p><a href=\"https://y\">x</a></p>\n");
    html("[](u)\n", "<p><a href=\"u\"></a></p>\n");
    html("[x]()\n", "<p><a href=\"\">x</a></p>\n");
}

#[test]
fn link_label_and_url_must_be_adjacent() {
    html("[x] (y)\n", "<p>[x] (y)</p>\n");
}

#[test]
fn link_with_a_break_inside_is_literal() {
    html("[x\n](y)\n", "<p>[x ](y)</p>\n");
}

#[test]
fn images() {
    html(
        "![alt text](img.png)\n",
        "<p><img src=\"img.png\" alt=\"alt text\" /></p>\n",
    );
}

#[test]
fn bang_without_bracket_is_literal() {
    html("hey!\n", "<p>hey!</p>\n");
}

#[test]
fn styled_link_label() {
    let doc = parse("[**b**](u)\n");
    match doc.children[0].inlines[0] {
        Inline::Link(ref nl) => {
            assert_eq!(nl.url, "u");
            assert_eq!(nl.text.len(), 1);
            assert!(nl.text[0].style.bold);
            assert_eq!(nl.text[0].text, "b");
        }
        ref other => panic!("expected link, got {:?}", other),
    }
}

#[test]
fn dangerous_urls_are_dropped() {
    // The URL ends at the first `)`; the href is suppressed entirely.
    html(
        "[x](javascript:alert(1))\n",
        "<p><a href=\"\">x</a>)</p>\n",
    );
}

#[test]
fn style_toggles_span_line_breaks() {
    html("**a\nb**\n", "<p><strong>a b</strong></p>\n");
}
