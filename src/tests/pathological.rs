use super::*;
use pretty_assertions::assert_eq;
use ntest::timeout;

use crate::{markdown_to_html, Options};

fn body_only() -> Options {
    let mut options = Options::default();
    options.render.body_only = true;
    options
}

// input: python3 -c 'n = 20000; print("*a_ " * n)'
#[test]
#[timeout(4000)]
fn pathological_emphases() {
    let n = 20_000;
    let input = "*a_ ".repeat(n);
    let out = markdown_to_html(&input, &body_only());
    assert!(out.contains("a"));
}

// input: python3 -c 'n = 5000; print("[" * n)'
#[test]
#[timeout(4000)]
fn pathological_open_brackets() {
    let n = 5_000;
    let input = "[".repeat(n);
    let out = markdown_to_html(&input, &body_only());
    assert!(out.contains("["));
}

// input: python3 -c 'n = 10000; print(">" * n + "a")'
#[test]
#[timeout(4000)]
fn pathological_quote_nesting() {
    let n = 10_000;
    let input = format!("{}a\n", "> ".repeat(n));
    let out = markdown_to_html(&input, &body_only());
    assert!(out.contains("<blockquote>"));
}

// input: python3 -c 'n = 2000; print("|" + "x|" * n + "\n|" + "-|" * n)'
#[test]
#[timeout(4000)]
fn pathological_table_columns() {
    let n = 2_000;
    let input = format!("|{}\n|{}\n", "x|".repeat(n), "-|".repeat(n));
    markdown_to_html(&input, &body_only());
}

// input: python3 -c 'n = 5000; print("- " * n)'
#[test]
#[timeout(4000)]
fn pathological_list_nesting() {
    let n = 5_000;
    let input = format!("{}a\n", "- ".repeat(n));
    let out = markdown_to_html(&input, &body_only());
    assert!(out.contains("<li>"));
}

// input: python3 -c 'n = 20000; print("`a` " * n)'
#[test]
#[timeout(4000)]
fn pathological_code_spans() {
    let n = 20_000;
    let input = "`a` ".repeat(n);
    let out = markdown_to_html(&input, &body_only());
    assert!(out.contains("<code>a</code>"));
}

#[test]
#[timeout(4000)]
fn pathological_unterminated_backticks() {
    let n = 20_000;
    let input = "` ".repeat(n);
    markdown_to_html(&input, &body_only());
}

#[test]
#[timeout(4000)]
fn big_flat_document_renders_everywhere() {
    let input = "word word word\n\n".repeat(5_000);
    let options = Options::default();
    crate::markdown_to_console(&input, &options);
    crate::markdown_to_commonmark(&input, &options);
    crate::markdown_to_ranges(&input, &options);
}
