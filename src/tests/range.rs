use super::*;
use pretty_assertions::assert_eq;
use crate::nodes::{Color, TextStyle};
use crate::{markdown_to_ranges, Options};

fn ranges(input: &str, width: usize) -> Vec<crate::StyleRange> {
    let mut options = Options::default();
    options.render.width = width;
    markdown_to_ranges(input, &options)
}

#[test]
fn plain_text_yields_no_ranges() {
    assert!(ranges("just words\n", 40).is_empty());
}

#[test]
fn bold_span_columns_count_code_points() {
    let r = ranges("**héllo**\n", 40);
    assert_eq!(r.len(), 1);
    assert_eq!(r[0].line, 0);
    assert_eq!(r[0].start_col, 0);
    // Five code points, not six bytes.
    assert_eq!(r[0].end_col, 5);
    assert!(r[0].style.bold);
}

#[test]
fn heading_rules_and_text_have_distinct_styles() {
    let r = ranges("# Hi\n", 20);
    assert_eq!(r.len(), 3);

    // Left rule, title, right rule.
    assert_eq!((r[0].start_col, r[0].end_col), (0, 8));
    assert_eq!(r[0].style.fg, Color::SlateGrey);

    assert_eq!((r[1].start_col, r[1].end_col), (9, 11));
    assert!(r[1].style.bold);

    assert_eq!((r[2].start_col, r[2].end_col), (12, 20));
    assert_eq!(r[2].style.fg, Color::SlateGrey);
}

#[test]
fn lines_advance_with_output_rows() {
    let r = ranges("para\n\n> quote\n", 40);
    // The quote bar sits on line 2 (0-based): "para", blank, quote.
    assert!(r.iter().any(|s| s.line == 2 && s.style.fg == Color::SlateGrey));
}

#[test]
fn codespan_carries_background() {
    let r = ranges("`x`\n", 40);
    assert_eq!(r.len(), 1);
    assert_eq!(
        r[0].style,
        TextStyle {
            fg: Color::Purple,
            bg: Color::DarkGrey,
            ..TextStyle::default()
        }
    );
}

#[test]
fn no_escape_bytes_count_as_columns() {
    // A hyperlink's escape framing must not shift later columns.
    let r = ranges("[ab](http://x) **cd**\n", 80);
    let bold = r.iter().find(|s| s.style.bold).expect("bold range");
    // "ab cd": link text occupies columns 0-1; the bold run starts with
    // its separating space at column 2.
    assert_eq!((bold.start_col, bold.end_col), (2, 5));
}

#[test]
fn deterministic_for_identical_input() {
    let a = ranges("# t\n\n- one\n- two\n", 30);
    let b = ranges("# t\n\n- one\n- two\n", 30);
    assert_eq!(a, b);
}
