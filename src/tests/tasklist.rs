use super::*;
use pretty_assertions::assert_eq;
use crate::nodes::{ListVariant, NodeValue};

#[test]
fn basic() {
    html(
        concat!("- [x] done\n", "- [ ] todo\n"),
        concat!(
            "<ul class=\"task-list\">\n",
            "<li><input type=\"checkbox\" checked=\"\" disabled=\"\" /> done</li>\n",
            "<li><input type=\"checkbox\" disabled=\"\" /> todo</li>\n",
            "</ul>\n"
        ),
    );
}

#[test]
fn checkbox_state_is_recorded() {
    let doc = parse("- [x] a\n- [ ] b\n");
    let list = &doc.children[0];
    match list.value {
        NodeValue::List(nl) => assert_eq!(nl.variant, ListVariant::Task),
        ref other => panic!("expected list, got {:?}", other),
    }
    let checks: Vec<bool> = list
        .children
        .iter()
        .map(|item| match item.value {
            NodeValue::Item(ni) => ni.checked,
            ref other => panic!("expected item, got {:?}", other),
        })
        .collect();
    assert_eq!(checks, vec![true, false]);
}

#[test]
fn uppercase_x_checks() {
    let doc = parse("- [X] a\n");
    match doc.children[0].children[0].value {
        NodeValue::Item(ni) => assert!(ni.checked),
        ref other => panic!("expected item, got {:?}", other),
    }
}

#[test]
fn checkbox_needs_trailing_space() {
    // `[x]` hugging the text is a plain bullet with literal brackets.
    let doc = parse("- [x]tight\n");
    match doc.children[0].value {
        NodeValue::List(nl) => assert_eq!(nl.variant, ListVariant::Unordered),
        ref other => panic!("expected list, got {:?}", other),
    }
}

#[test]
fn console_markers_and_colors() {
    let plain = console_plain("- [x] done\n- [ ] todo\n", 40);
    let lines: Vec<&str> = plain.lines().collect();
    assert_eq!(lines[0], "☑ done");
    assert_eq!(lines[1], "☐ todo");

    let raw = console("- [x] done\n- [ ] todo\n", 40);
    // Checked green, unchecked red.
    assert!(raw.contains("\x1b[32m☑"));
    assert!(raw.contains("\x1b[31m☐"));
}
