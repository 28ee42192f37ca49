use super::*;
use pretty_assertions::assert_eq;
use crate::nodes::{NodeValue, TableAlignment};

#[test]
fn basic() {
    html(
        "| A | B |\n|---|---|\n| 1 | 2 |\n",
        concat!(
            "<table>\n",
            "<tr><th>A</th><th>B</th></tr>\n",
            "<tr><td>1</td><td>2</td></tr>\n",
            "</table>\n"
        ),
    );
}

#[test]
fn alignments() {
    let doc = parse("| a | b | c | d |\n|:--|:-:|--:|---|\n");
    match doc.children[0].value {
        NodeValue::Table(ref nt) => {
            assert_eq!(nt.ncol, 4);
            assert_eq!(
                nt.alignments,
                vec![
                    TableAlignment::Left,
                    TableAlignment::Center,
                    TableAlignment::Right,
                    TableAlignment::None
                ]
            );
        }
        ref other => panic!("expected table, got {:?}", other),
    }
}

#[test]
fn column_count_is_fixed_by_the_header() {
    html(
        "| a | b |\n|---|---|\n| 1 |\n| 1 | 2 | 3 |\n",
        concat!(
            "<table>\n",
            "<tr><th>a</th><th>b</th></tr>\n",
            "<tr><td>1</td><td></td></tr>\n",
            "<tr><td>1</td><td>2</td></tr>\n",
            "</table>\n"
        ),
    );
}

#[test]
fn mismatched_separator_stays_a_paragraph() {
    let doc = parse("| a | b |\n|---|\n");
    assert!(matches!(doc.children[0].value, NodeValue::Paragraph));
}

#[test]
fn pipeless_line_closes_the_table() {
    let doc = parse("| a |\n|---|\n| 1 |\nplain\n");
    assert!(matches!(doc.children[0].value, NodeValue::Table(..)));
    assert!(matches!(doc.children[1].value, NodeValue::Paragraph));
}

#[test]
fn escaped_pipes_are_literal() {
    html(
        "| a\\|b | c |\n|---|---|\n",
        concat!("<table>\n", "<tr><th>a|b</th><th>c</th></tr>\n", "</table>\n"),
    );
}

#[test]
fn cells_hold_inline_content() {
    html(
        "| **bold** | `code` |\n|---|---|\n",
        concat!(
            "<table>\n",
            "<tr><th><strong>bold</strong></th><th><code>code</code></th></tr>\n",
            "</table>\n"
        ),
    );
}

#[test]
fn console_draws_box_borders() {
    let plain = console_plain("| A | B |\n|---|---|\n| 1 | 2 |\n", 21);
    let lines: Vec<&str> = plain.lines().collect();

    // (21 - 3) / 2 = 9 columns per cell.
    assert_eq!(lines[0], format!("┌{0}┬{0}┐", "─".repeat(9)));
    assert_eq!(lines[1], format!("│ A{0}│ B{0}│", " ".repeat(7)));
    assert_eq!(lines[2], format!("├{0}┼{0}┤", "─".repeat(9)));
    assert_eq!(lines[3], format!("│ 1{0}│ 2{0}│", " ".repeat(7)));
    assert_eq!(lines[4], format!("└{0}┴{0}┘", "─".repeat(9)));
}

#[test]
fn console_cell_wraps_at_column_width() {
    let plain = console_plain(
        "| words that wrap | b |\n|---|---|\n",
        21,
    );
    // The cell reflows inside its 9-column budget, one word per line.
    let lines: Vec<&str> = plain.lines().collect();
    assert!(lines.len() > 4);
    assert!(lines[1].starts_with("│ words"));
    assert!(lines[2].contains("that"));
    assert!(lines[3].contains("wrap"));
}
