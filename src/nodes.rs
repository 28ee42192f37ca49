//! The Markdown AST.

use crate::lexer::{SourcePos, Token};
use crate::parser::alert::AlertType;

/// The core block node enum.
///
/// Containers (`Document`, `Quote`, `List`, `Item`, `Table`, `TableRow`)
/// hold other blocks in [`Block::children`]; leaves hold raw tokens while
/// open and a flat [`Inline`] list once closed.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    /// The root of every document. Contains **blocks**.
    Document,

    /// **Container**. A block quote.
    ///
    /// ``` md
    /// > A block quote.
    /// ```
    Quote,

    /// **Container**. A list. Contains list items of a single variant;
    /// an item of a different variant closes the list.
    List(NodeList),

    /// **Container**. A list item. Contains other **blocks**.
    Item(NodeItem),

    /// **Container**. A table, reinterpreted from a paragraph whose second
    /// line is a column-alignment row. Contains table rows.
    Table(NodeTable),

    /// **Container**. A table row. The `bool` records whether this is the
    /// header row. Contains table cells.
    TableRow(bool),

    /// **Leaf**. A table cell. Contains **inlines**.
    TableCell,

    /// **Leaf**. A blank line, or a thematic break when `thematic` is set.
    Break(NodeBreak),

    /// **Leaf**. A fenced code block. The body is not parsed as Markdown;
    /// it accumulates verbatim in [`NodeCodeBlock::literal`].
    CodeBlock(NodeCodeBlock),

    /// **Leaf**. An ATX heading. Contains **inlines**.
    Heading(NodeHeading),

    /// **Leaf**. A paragraph. Contains **inlines**.
    Paragraph,

    /// **Leaf**. A GitHub-style alert: a quote whose first inner line is a
    /// `[!TAG]` marker. The remainder of the quote body becomes the
    /// alert's inline content.
    Alert(NodeAlert),
}

/// Alignment of a single table column.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TableAlignment {
    /// Column content is unaligned.
    #[default]
    None,

    /// Column content is aligned left.
    Left,

    /// Column content is centered.
    Center,

    /// Column content is aligned right.
    Right,
}

/// The variant of a list. Fixed at creation; a marker of a different
/// variant closes the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListVariant {
    /// A bullet list.
    #[default]
    Unordered,

    /// A numbered list.
    Ordered,

    /// A bullet list whose items carry `[ ]`/`[x]` checkboxes.
    Task,
}

/// The metadata of a list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NodeList {
    /// The list variant.
    pub variant: ListVariant,

    /// For ordered lists, the ordinal the list starts at.
    pub start: usize,

    /// Whether the list is tight (no blank lines between items).
    pub tight: bool,
}

impl NodeList {
    /// Whether `other` may continue a list created with `self`.
    pub fn matches(&self, other: &NodeList) -> bool {
        self.variant == other.variant
    }
}

/// The metadata of a list item.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NodeItem {
    /// For task items, whether the checkbox is checked.
    pub checked: bool,

    /// The item's left edge: the column just past the marker and its
    /// trailing spaces. Continuation lines must be indented at least this
    /// far.
    pub indent: usize,
}

/// The metadata of a table.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NodeTable {
    /// Column count, fixed by the header row.
    pub ncol: usize,

    /// Per-column alignments from the separator row.
    pub alignments: Vec<TableAlignment>,
}

/// The metadata of a Break leaf.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NodeBreak {
    /// True for a thematic break (`---`), false for a blank line.
    pub thematic: bool,
}

/// The metadata and accumulated body of a fenced code block.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NodeCodeBlock {
    /// The exact opening fence run. The closer must use the same character
    /// and be at least as long.
    pub fence: String,

    /// The info string after the opening fence, if any.
    pub info: String,

    /// A recognized directive name in the info string, if any.
    pub directive: Option<Directive>,

    /// The literal body, accumulated line by line while the block is open.
    pub literal: String,
}

/// A recognized directive info-string on a fenced block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// An admonition rendered as a colored box.
    Admonition(AlertType),

    /// A generated table of contents (`toc`, `toctree`,
    /// `table-of-contents`).
    TableOfContents,
}

/// The metadata of a heading.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NodeHeading {
    /// The level of the heading, from 1 to 6.
    pub level: u32,

    /// The flattened heading text, filled when the leaf closes. Consumers
    /// (anchors, the table of contents) copy from here by value.
    pub text: String,
}

/// The metadata of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeAlert {
    /// The alert severity from the `[!TAG]` marker.
    pub severity: AlertType,
}

impl NodeValue {
    /// Indicates whether this node is a container.
    pub fn container(&self) -> bool {
        matches!(
            *self,
            NodeValue::Document
                | NodeValue::Quote
                | NodeValue::List(..)
                | NodeValue::Item(..)
                | NodeValue::Table(..)
                | NodeValue::TableRow(..)
        )
    }

    /// Indicates whether this node accumulates raw tokens line by line.
    pub fn accepts_lines(&self) -> bool {
        matches!(
            *self,
            NodeValue::Paragraph
                | NodeValue::Heading(..)
                | NodeValue::CodeBlock(..)
                | NodeValue::Alert(..)
        )
    }

    /// Indicates whether this node holds inline content once closed.
    pub fn contains_inlines(&self) -> bool {
        matches!(
            *self,
            NodeValue::Paragraph
                | NodeValue::Heading(..)
                | NodeValue::Alert(..)
                | NodeValue::TableCell
        )
    }
}

/// A single node in the block tree.
///
/// Nodes own their children; there are no parent pointers. The parser
/// passes `&mut` references down the call stack instead. `open` is the
/// lifecycle flag: a leaf's `inlines` is empty while `open` and fully
/// populated once closed.
#[derive(Debug, Clone, PartialEq)]
pub struct Block<'i> {
    /// The node value itself.
    pub value: NodeValue,

    /// The input row this block started at (zero-based).
    pub start_row: usize,

    /// Lifecycle flag. A closed block is never reopened.
    pub open: bool,

    /// Child blocks, containers only. Append-only; never reordered.
    pub children: Vec<Block<'i>>,

    /// Raw tokens accumulated by an open leaf.
    pub tokens: Vec<Token<'i>>,

    /// Inline content of a closed leaf.
    pub inlines: Vec<Inline>,

    /// Whether the last line attributed to this block was blank. Used to
    /// decide list tightness.
    pub last_line_blank: bool,
}

impl<'i> Block<'i> {
    /// Make a new open block of the given kind.
    pub fn new(value: NodeValue, start_row: usize) -> Block<'i> {
        Block {
            value,
            start_row,
            open: true,
            children: Vec::new(),
            tokens: Vec::new(),
            inlines: Vec::new(),
            last_line_blank: false,
        }
    }

    /// The last child, if it is still open.
    pub fn last_open_child(&mut self) -> Option<&mut Block<'i>> {
        match self.children.last_mut() {
            Some(child) if child.open => Some(child),
            _ => None,
        }
    }

    /// Whether a child of kind `child` may be appended here. A violation
    /// is a parser bug, not a property of the input.
    pub fn can_contain(&self, child: &NodeValue) -> bool {
        if let NodeValue::Document = *child {
            return false;
        }

        match self.value {
            NodeValue::Document | NodeValue::Quote | NodeValue::Item(..) => !matches!(
                *child,
                NodeValue::Item(..) | NodeValue::TableRow(..) | NodeValue::TableCell
            ),
            NodeValue::List(..) => matches!(*child, NodeValue::Item(..)),
            NodeValue::Table(..) => matches!(*child, NodeValue::TableRow(..)),
            NodeValue::TableRow(..) => matches!(*child, NodeValue::TableCell),
            _ => false,
        }
    }

    /// Append a child, asserting the containment invariant.
    pub fn append(&mut self, child: Block<'i>) {
        assert!(
            self.can_contain(&child.value),
            "{:?} cannot contain {:?}",
            self.value,
            child.value
        );
        self.children.push(child);
    }

    /// The position of the first raw token, if any.
    pub fn first_token_pos(&self) -> Option<SourcePos> {
        self.tokens.first().map(|t| t.pos)
    }
}

/// A text style: independent attribute flags plus optional palette colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    pub blink: bool,
    pub reverse: bool,
    pub hide: bool,
    pub fg: Color,
    pub bg: Color,
}

impl TextStyle {
    /// The default style with a foreground color.
    pub fn fg(color: Color) -> TextStyle {
        TextStyle {
            fg: color,
            ..TextStyle::default()
        }
    }

    /// True if no attribute or color is set.
    pub fn is_plain(&self) -> bool {
        *self == TextStyle::default()
    }

    /// This style with `other`'s attributes and colors layered on top.
    /// `other`'s colors win where set.
    pub fn union(&self, other: &TextStyle) -> TextStyle {
        TextStyle {
            bold: self.bold || other.bold,
            italic: self.italic || other.italic,
            underline: self.underline || other.underline,
            strike: self.strike || other.strike,
            blink: self.blink || other.blink,
            reverse: self.reverse || other.reverse,
            hide: self.hide || other.hide,
            fg: if other.fg == Color::Default {
                self.fg
            } else {
                other.fg
            },
            bg: if other.bg == Color::Default {
                self.bg
            } else {
                other.bg
            },
        }
    }
}

/// The fixed color palette: the eight basic terminal colors, eight named
/// extended RGB entries, and Default. Each renderer maps entries to its own
/// output vocabulary (SGR parameters, CSS classes, hex strings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Color {
    #[default]
    Default,

    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,

    Orange,
    Purple,
    Pink,
    Teal,
    Coral,
    SlateGrey,
    LightGrey,
    DarkGrey,
}

impl Color {
    /// The RGB value of an extended palette entry; `None` for the basic
    /// eight and Default, which the terminal resolves itself.
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        match *self {
            Color::Orange => Some((255, 165, 0)),
            Color::Purple => Some((155, 89, 182)),
            Color::Pink => Some((255, 105, 180)),
            Color::Teal => Some((0, 128, 128)),
            Color::Coral => Some((255, 127, 80)),
            Color::SlateGrey => Some((112, 128, 144)),
            Color::LightGrey => Some((211, 211, 211)),
            Color::DarkGrey => Some((40, 40, 40)),
            _ => None,
        }
    }

    /// The SGR foreground parameter string for this entry.
    pub fn sgr_fg(&self) -> String {
        match self.rgb() {
            Some((r, g, b)) => format!("38;2;{};{};{}", r, g, b),
            None => match *self {
                Color::Default => "39".to_string(),
                Color::Black => "30".to_string(),
                Color::Red => "31".to_string(),
                Color::Green => "32".to_string(),
                Color::Yellow => "33".to_string(),
                Color::Blue => "34".to_string(),
                Color::Magenta => "35".to_string(),
                Color::Cyan => "36".to_string(),
                Color::White => "37".to_string(),
                _ => unreachable!(),
            },
        }
    }

    /// The SGR background parameter string for this entry.
    pub fn sgr_bg(&self) -> String {
        match self.rgb() {
            Some((r, g, b)) => format!("48;2;{};{};{}", r, g, b),
            None => match *self {
                Color::Default => "49".to_string(),
                Color::Black => "40".to_string(),
                Color::Red => "41".to_string(),
                Color::Green => "42".to_string(),
                Color::Yellow => "43".to_string(),
                Color::Blue => "44".to_string(),
                Color::Magenta => "45".to_string(),
                Color::Cyan => "46".to_string(),
                Color::White => "47".to_string(),
                _ => unreachable!(),
            },
        }
    }

    /// A CSS color string for this entry.
    pub fn css(&self) -> &'static str {
        match *self {
            Color::Default => "inherit",
            Color::Black => "#000000",
            Color::Red => "#cc241d",
            Color::Green => "#98971a",
            Color::Yellow => "#d79921",
            Color::Blue => "#458588",
            Color::Magenta => "#b16286",
            Color::Cyan => "#689d6a",
            Color::White => "#ffffff",
            Color::Orange => "#ffa500",
            Color::Purple => "#9b59b6",
            Color::Pink => "#ff69b4",
            Color::Teal => "#008080",
            Color::Coral => "#ff7f50",
            Color::SlateGrey => "#708090",
            Color::LightGrey => "#d3d3d3",
            Color::DarkGrey => "#282828",
        }
    }
}

/// A styled text run inside an inline sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InlineText {
    pub style: TextStyle,
    pub text: String,
    pub pos: SourcePos,
}

/// The details of a link destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeLink {
    /// The link destination.
    pub url: String,

    /// The visible link text.
    pub text: Vec<InlineText>,
}

/// The details of an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeImage {
    /// The image source.
    pub src: String,

    /// The alt text.
    pub alt: Vec<InlineText>,
}

/// An inline node. Leaves hold an ordered sequence of these once closed.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    /// Styled text.
    Text(InlineText),

    /// A code span. Internal whitespace is collapsed.
    Codespan(String),

    /// A `<...>`-delimited autolink; the URL doubles as the visible text.
    Autolink(String),

    /// A `[text](url)` link.
    Link(NodeLink),

    /// An `![alt](src)` image.
    Image(NodeImage),

    /// A hard line break.
    LineBreak,
}

impl Inline {
    /// The visible text of this inline, appended to `out`.
    pub fn push_plain_text(&self, out: &mut String) {
        match *self {
            Inline::Text(ref t) => out.push_str(&t.text),
            Inline::Codespan(ref t) => out.push_str(t),
            Inline::Autolink(ref url) => out.push_str(url),
            Inline::Link(ref nl) => {
                for t in &nl.text {
                    out.push_str(&t.text);
                }
            }
            Inline::Image(ref ni) => {
                for t in &ni.alt {
                    out.push_str(&t.text);
                }
            }
            Inline::LineBreak => out.push('\n'),
        }
    }
}

/// The flattened visible text of an inline sequence.
pub fn collect_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        inline.push_plain_text(&mut out);
    }
    out
}
