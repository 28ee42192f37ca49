use super::*;
use pretty_assertions::assert_eq;
use crate::{markdown_to_console, Options};

#[test]
fn heading_one_pads_with_double_rules() {
    let plain = console_plain("# Hello\n", 20);
    assert_eq!(
        plain.lines().next(),
        Some(format!("{} Hello {}", "═".repeat(6), "═".repeat(7)).as_str())
    );

    let raw = console("# Hello\n", 20);
    assert!(raw.contains("\x1b[1m"), "level-one headings are bold");
}

#[test]
fn heading_two_pads_with_single_rules() {
    let plain = console_plain("## Hi\n", 20);
    assert_eq!(
        plain.lines().next(),
        Some(format!("{} Hi {}", "─".repeat(6), "─".repeat(7)).as_str())
    );
}

#[test]
fn heading_three_is_italic_underline() {
    let raw = console("### deep\n", 40);
    assert!(raw.contains("\x1b[3;4m") || raw.contains("\x1b[4;3m"));
}

#[test]
fn words_wrap_at_width() {
    let plain = console_plain("one two three four five\n", 10);
    let lines: Vec<&str> = plain.lines().collect();
    assert_eq!(lines, vec!["one two", "three four", "five"]);
}

#[test]
fn a_word_longer_than_the_width_is_not_split() {
    let plain = console_plain("antidisestablishmentarianism\n", 10);
    assert_eq!(plain.lines().next(), Some("antidisestablishmentarianism"));
}

#[test]
fn quote_leaders_prefix_every_line() {
    let plain = console_plain("> aa bb cc dd\n", 8);
    for line in plain.lines() {
        assert!(line.starts_with("┃ "), "line {:?} lost its leader", line);
    }
    assert!(plain.lines().count() > 1);
}

#[test]
fn nested_leaders_stack_left_to_right() {
    let plain = console_plain("> - item text here\n", 12);
    let lines: Vec<&str> = plain.lines().collect();
    assert!(lines[0].starts_with("┃ ‣ "));
    // The continuation line keeps the quote bar and the item indent.
    assert!(lines[1].starts_with("┃   "));
}

#[test]
fn code_fence_in_list_in_quote_keeps_all_leaders() {
    let plain = console_plain("> - ```\n>   fenced\n>   ```\n", 30);
    let lines: Vec<&str> = plain.lines().collect();
    assert!(lines[0].starts_with("┃ ‣ ╭──"));
    assert_eq!(lines[1], "┃   │ fenced");
    assert!(lines[2].starts_with("┃   ╰──"));
}

#[test]
fn ordered_markers_renumber_sequentially() {
    let plain = console_plain("1. x\n3. y\n", 40);
    let lines: Vec<&str> = plain.lines().collect();
    assert_eq!(lines[0], "1. x");
    assert_eq!(lines[1], "2. y");
}

#[test]
fn wide_lists_zero_pad_their_markers() {
    let input: String = (0..10).map(|_| "1. a\n").collect();
    let plain = console_plain(&input, 40);
    let lines: Vec<&str> = plain.lines().collect();
    assert_eq!(lines[0], "01. a");
    assert_eq!(lines[9], "10. a");
}

#[test]
fn codespan_swaps_colors() {
    let raw = console("`x`\n", 40);
    // Purple foreground over the dark-grey background.
    assert!(raw.contains("38;2;155;89;182"));
    assert!(raw.contains("48;2;40;40;40"));
}

#[test]
fn style_transitions_are_minimized() {
    let raw = console("**a b**\n", 40);
    // One bold enable covers both words; no re-enable between them.
    assert_eq!(raw.matches("\x1b[1m").count(), 1);
}

#[test]
fn reset_uses_the_short_form() {
    let raw = console("**a**\n", 40);
    assert!(raw.contains("\x1b[m"));
}

#[test]
fn buffered_output_suppresses_line_clears() {
    let mut options = Options::default();
    options.render.buffered = true;
    let buffered = markdown_to_console("hi\n", &options);
    assert!(!buffered.contains("\x1b[0K"));

    let unbuffered = markdown_to_console("hi\n", &Options::default());
    assert!(unbuffered.contains("\x1b[0K"));
}

#[test]
fn indent_margin_prefixes_lines() {
    let mut options = Options::default();
    options.render.width = 40;
    options.render.indent = 4;
    let out = strip_ansi(&markdown_to_console("text\n", &options));
    assert_eq!(out.lines().next(), Some("    text"));
}

#[test]
fn document_children_separate_with_blank_lines() {
    let plain = console_plain("a\n\nb\n", 40);
    assert_eq!(plain, "a\n\nb\n");
}

#[test]
fn thematic_break_fills_the_width() {
    let plain = console_plain("---\n", 12);
    assert_eq!(plain.lines().next(), Some("─".repeat(12).as_str()));
}

#[test]
fn image_without_decoder_renders_its_label() {
    let plain = console_plain("![a pic](p.png)\n", 40);
    assert_eq!(plain.lines().next(), Some("a pic → p.png"));
}
