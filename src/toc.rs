//! Table-of-contents builder.
//!
//! Walks a closed document for headings and copies their text by value;
//! nothing here points back into the source tree. The `toc` directive
//! expands to this structure: the HTML renderer links entries by fragment
//! anchor, the console renderer substitutes the generated list block.

use crate::html::Anchorizer;
use crate::nodes::{
    Block, Inline, InlineText, ListVariant, NodeItem, NodeList, NodeValue,
};

/// One table-of-contents entry, nested by heading level.
#[derive(Debug, Clone, Default)]
pub struct TocEntry {
    /// Heading level this entry came from.
    pub level: u32,

    /// The heading text, copied by value.
    pub text: String,

    /// The unique fragment anchor for the heading.
    pub anchor: String,

    /// Entries under deeper headings.
    pub children: Vec<TocEntry>,
}

/// A generated table of contents.
#[derive(Debug, Clone, Default)]
pub struct Toc {
    pub entries: Vec<TocEntry>,
}

/// Collect every heading in the document into a nested navigation tree.
/// Anchors are assigned the way the HTML renderer assigns heading ids, so
/// the two agree.
pub fn build(document: &Block) -> Toc {
    let mut headings = Vec::new();
    collect(document, &mut headings);

    let mut anchorizer = Anchorizer::new();
    let mut toc = Toc::default();
    let mut open_levels: Vec<u32> = Vec::new();

    // Entries nest by level: each heading becomes a child of the nearest
    // preceding heading with a smaller level.
    for (level, text) in headings {
        let entry = TocEntry {
            level,
            anchor: anchorizer.anchorize(&text),
            text,
            children: Vec::new(),
        };

        while open_levels.last().is_some_and(|&l| l >= level) {
            open_levels.pop();
        }

        // One entry was pushed per open level, so following last children
        // down open_levels.len() steps lands on the insertion point.
        let mut slot: &mut Vec<TocEntry> = &mut toc.entries;
        for _ in 0..open_levels.len() {
            let last = slot.last_mut().expect("one entry exists per open level");
            slot = &mut last.children;
        }
        slot.push(entry);
        open_levels.push(level);
    }

    toc
}

fn collect(block: &Block, out: &mut Vec<(u32, String)>) {
    if let NodeValue::Heading(ref nh) = block.value {
        out.push((nh.level, nh.text.clone()));
    }
    for child in &block.children {
        collect(child, out);
    }
}

/// Materialize the table of contents as an unordered list block, one item
/// per entry, for renderers that display rather than link it.
pub fn to_list_block(toc: &Toc) -> Block<'static> {
    entries_to_list(&toc.entries)
}

fn entries_to_list(entries: &[TocEntry]) -> Block<'static> {
    let mut list = Block::new(
        NodeValue::List(NodeList {
            variant: ListVariant::Unordered,
            start: 1,
            tight: true,
        }),
        0,
    );
    list.open = false;

    for entry in entries {
        let mut item = Block::new(
            NodeValue::Item(NodeItem {
                checked: false,
                indent: 2,
            }),
            0,
        );
        item.open = false;

        let mut para = Block::new(NodeValue::Paragraph, 0);
        para.open = false;
        para.inlines.push(Inline::Text(InlineText {
            text: entry.text.clone(),
            ..InlineText::default()
        }));
        item.append(para);

        if !entry.children.is_empty() {
            item.append(entries_to_list(&entry.children));
        }

        list.append(item);
    }

    list
}
