use super::*;
use pretty_assertions::assert_eq;
use crate::nodes::NodeValue;
use crate::parser::alert::AlertType;

#[test]
fn basic() {
    html(
        concat!("> [!note]\n", "> Pay attention\n"),
        concat!(
            "<div class=\"alert alert-note\">\n",
            "<p class=\"alert-title\">Note</p>\n",
            "<p>Pay attention</p>\n",
            "</div>\n",
        ),
    );
}

#[test]
fn tag_is_case_insensitive() {
    for tag in ["[!WARNING]", "[!warning]", "[!Warning]"] {
        let input = format!("> {}\n> text\n", tag);
        let doc = parse(&input);
        match doc.children[0].value {
            NodeValue::Alert(ref na) => assert_eq!(na.severity, AlertType::Warning),
            ref other => panic!("expected alert, got {:?}", other),
        }
    }
}

#[test]
fn every_severity_parses() {
    let severities = [
        ("note", AlertType::Note),
        ("info", AlertType::Info),
        ("tip", AlertType::Tip),
        ("important", AlertType::Important),
        ("warning", AlertType::Warning),
        ("caution", AlertType::Caution),
    ];
    for (tag, severity) in severities {
        let input = format!("> [!{}]\n> body\n", tag);
        let doc = parse(&input);
        match doc.children[0].value {
            NodeValue::Alert(ref na) => assert_eq!(na.severity, severity),
            ref other => panic!("expected alert for {}, got {:?}", tag, other),
        }
    }
}

#[test]
fn unknown_tag_stays_a_quote() {
    let doc = parse("> [!BOGUS]\n> body\n");
    assert!(matches!(doc.children[0].value, NodeValue::Quote));
}

#[test]
fn tag_with_trailing_text_stays_a_quote() {
    let doc = parse("> [!NOTE] extra\n");
    assert!(matches!(doc.children[0].value, NodeValue::Quote));
}

#[test]
fn body_is_inline_content() {
    let doc = parse("> [!TIP]\n> one\n> two\n");
    let alert = &doc.children[0];
    assert!(matches!(alert.value, NodeValue::Alert(..)));
    assert_eq!(crate::nodes::collect_text(&alert.inlines), "one two");
}

#[test]
fn console_renders_a_colored_box() {
    let plain = console_plain("> [!NOTE]\n> body\n", 20);
    let lines: Vec<&str> = plain.lines().collect();
    assert_eq!(lines[0], format!("╭─ Note {}┐", "─".repeat(11)));
    assert_eq!(lines[1], format!("│ body{} │", " ".repeat(12)));
    assert_eq!(lines[2], format!("╰{}┘", "─".repeat(18)));

    // The note box border is blue.
    let raw = console("> [!NOTE]\n> body\n", 20);
    assert!(raw.contains("\x1b[34m"));
}

#[test]
fn caution_box_is_red() {
    let raw = console("> [!CAUTION]\n> stop\n", 40);
    assert!(raw.contains("\x1b[31m"));
}
