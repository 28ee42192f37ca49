mod alerts;
mod autolink;
mod console;
mod core;
mod graphics;
mod inlines;
mod lexer;
mod pathological;
mod quotes;
mod range;
mod table;
mod tasklist;
mod toc;

pub use pretty_assertions::assert_eq;

use crate::nodes::Block;
use crate::{
    markdown_to_commonmark, markdown_to_console, markdown_to_html, Options,
};

#[track_caller]
pub fn html(input: &str, expected: &str) {
    let mut options = Options::default();
    options.render.body_only = true;
    assert_eq!(markdown_to_html(input, &options), expected);
}

#[track_caller]
pub fn commonmark(input: &str, expected: &str) {
    let options = Options::default();
    assert_eq!(markdown_to_commonmark(input, &options), expected);
}

/// Canonical form is a fixed point: formatting its own output changes
/// nothing.
#[track_caller]
pub fn commonmark_stable(input: &str) {
    let options = Options::default();
    let once = markdown_to_commonmark(input, &options);
    let twice = markdown_to_commonmark(&once, &options);
    assert_eq!(once, twice);
}

pub fn parse(input: &str) -> Block<'_> {
    crate::parse_document(input, &Options::default())
}

pub fn console(input: &str, width: usize) -> String {
    let mut options = Options::default();
    options.render.width = width;
    markdown_to_console(input, &options)
}

/// Console output with every escape sequence stripped: what a reader
/// sees, position for position.
pub fn console_plain(input: &str, width: usize) -> String {
    strip_ansi(&console(input, width))
}

pub fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('[') => {
                for c in chars.by_ref() {
                    if ('\u{40}'..='\u{7e}').contains(&c) {
                        break;
                    }
                }
            }
            Some(']') | Some('_') => {
                let mut prev = ' ';
                for c in chars.by_ref() {
                    if prev == '\x1b' && c == '\\' {
                        break;
                    }
                    prev = c;
                }
            }
            _ => {}
        }
    }
    out
}
