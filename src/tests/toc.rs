use super::*;
use pretty_assertions::assert_eq;
use crate::toc::{build, to_list_block};

#[test]
fn entries_nest_by_level() {
    let doc = parse("# A\n## B\n### C\n## D\n# E\n");
    let toc = build(&doc);

    assert_eq!(toc.entries.len(), 2);
    assert_eq!(toc.entries[0].text, "A");
    assert_eq!(toc.entries[0].children.len(), 2);
    assert_eq!(toc.entries[0].children[0].text, "B");
    assert_eq!(toc.entries[0].children[0].children[0].text, "C");
    assert_eq!(toc.entries[0].children[1].text, "D");
    assert_eq!(toc.entries[1].text, "E");
}

#[test]
fn anchors_match_the_html_ids() {
    let doc = parse("# Stuff\n# Stuff\n");
    let toc = build(&doc);
    assert_eq!(toc.entries[0].anchor, "stuff");
    assert_eq!(toc.entries[1].anchor, "stuff-1");
}

#[test]
fn headings_inside_containers_are_collected() {
    let doc = parse("> # Quoted\n");
    let toc = build(&doc);
    assert_eq!(toc.entries.len(), 1);
    assert_eq!(toc.entries[0].text, "Quoted");
}

#[test]
fn out_of_order_levels_do_not_panic() {
    let doc = parse("### deep first\n# then top\n");
    let toc = build(&doc);
    assert_eq!(toc.entries.len(), 2);
}

#[test]
fn list_block_mirrors_the_nesting() {
    let doc = parse("# A\n## B\n");
    let list = to_list_block(&build(&doc));
    assert_eq!(list.children.len(), 1);
    // Item A holds its paragraph and the nested list for B.
    assert_eq!(list.children[0].children.len(), 2);
}

#[test]
fn toc_directive_expands_in_html() {
    html(
        "# One\n\n```toc\n```\n",
        concat!(
            "<h1 id=\"one\">One</h1>\n",
            "<ul class=\"toc\">\n",
            "<li><a href=\"#one\">One</a></li>\n",
            "</ul>\n"
        ),
    );
}

#[test]
fn toc_directive_expands_in_console() {
    let plain = console_plain("# Alpha\n\n## Beta\n\n```table-of-contents\n```\n", 40);
    let tail: Vec<&str> = plain.lines().rev().take(2).collect();
    assert_eq!(tail[1], "‣ Alpha");
    assert_eq!(tail[0], "  ‣ Beta");
}
