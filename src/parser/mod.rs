//! The block parser: builds the block tree one logical line at a time.
//!
//! The parser drives [`handle_line`](Parser::handle_line), a recursive
//! descent over the open spine of the tree. For each container it checks
//! whether the line strictly continues the container (trimming the
//! continuation markers if so), forwards a lazy paragraph continuation,
//! or rejects the line so the parent closes the container and opens a new
//! block. Malformed Markdown never fails; it degrades to paragraph text.

pub mod alert;
pub mod inlines;
pub mod options;
pub mod table;

use log::trace;

use crate::lexer::{self, Token, TokenKind};
use crate::nodes::{
    Block, Directive, ListVariant, NodeAlert, NodeBreak, NodeCodeBlock, NodeHeading, NodeItem,
    NodeList, NodeValue,
};
use crate::parser::alert::AlertType;
use crate::parser::options::Options;
use crate::scanners::{self, ItemDetail};
use crate::strings;

// Very deeply nested containers can cause quadratic performance issues.
// This constant bounds the nesting depth in open_new_block(). It is
// unlikely that a non-contrived markdown document is nested this deeply.
const MAX_NESTING: usize = 100;

/// Parse a Markdown document to a block tree.
///
/// See the documentation of the crate root for an example.
pub fn parse_document<'i>(input: &'i str, options: &Options) -> Block<'i> {
    let tokens = lexer::lex(input);
    let mut root = Block::new(NodeValue::Document, 0);
    let mut parser = Parser::new(options);

    for line in lines(&tokens) {
        parser.row = line.first().map_or(0, |t| t.pos.row);
        let accepted = parser.handle_line(&mut root, line, 0);
        debug_assert!(accepted, "the document rejected a line");
    }

    parser.close(&mut root);
    root
}

/// Split the token stream into logical lines: each slice runs up to and
/// including its BREAK; the last runs to (and excludes nothing before)
/// EOF. A line holding only the EOF token is not a line.
fn lines<'t, 'i>(tokens: &'t [Token<'i>]) -> Vec<&'t [Token<'i>]> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, t) in tokens.iter().enumerate() {
        match t.kind {
            TokenKind::Break => {
                out.push(&tokens[start..=i]);
                start = i + 1;
            }
            TokenKind::Eof => {
                if i > start {
                    out.push(&tokens[start..=i]);
                }
            }
            _ => {}
        }
    }
    out
}

pub struct Parser<'o> {
    options: &'o Options,
    row: usize,
}

impl<'o> Parser<'o> {
    fn new(options: &'o Options) -> Parser<'o> {
        Parser { options, row: 0 }
    }

    /// The central routine: dispatch one logical line against `block`.
    /// Returns false when the line is no continuation of `block`, so the
    /// caller closes it and tries the line elsewhere.
    fn handle_line<'i>(&mut self, block: &mut Block<'i>, line: &[Token<'i>], depth: usize) -> bool {
        match block.value {
            NodeValue::Document => {
                self.child_line(block, line, depth);
                true
            }
            NodeValue::Quote => self.quote_line(block, line, depth),
            NodeValue::List(..) => self.list_line(block, line, depth),
            NodeValue::Item(..) => self.item_line(block, line, depth),
            NodeValue::Table(..) => table::handle_line(block, line, self.row),
            NodeValue::CodeBlock(..) => self.code_line(block, line),
            NodeValue::Paragraph => self.paragraph_line(block, line),
            NodeValue::Alert(..) => self.alert_line(block, line),
            // Headings and breaks close at creation and are never the
            // open child a line is dispatched to.
            NodeValue::Heading(..)
            | NodeValue::Break(..)
            | NodeValue::TableRow(..)
            | NodeValue::TableCell => false,
        }
    }

    /// Offer a (trimmed) line inside a container: the open child gets it
    /// first; a rejection closes the child and opens a new block.
    fn child_line<'i>(&mut self, parent: &mut Block<'i>, line: &[Token<'i>], depth: usize) {
        // The paragraph→table reinterpretation needs the parent, so it is
        // checked before the paragraph sees its would-be second line.
        if table::try_convert(parent, line) {
            return;
        }

        let accepted = match parent.last_open_child() {
            Some(child) => self.handle_line(child, line, depth + 1),
            None => false,
        };
        if accepted {
            return;
        }

        self.close_last_child(parent);
        self.open_new_block(parent, line, depth);
    }

    /// Strict continuation: `[ ]{0..3} '>'`. Lazy continuation extends the
    /// innermost open paragraph without restating the marker.
    fn quote_line<'i>(&mut self, block: &mut Block<'i>, line: &[Token<'i>], depth: usize) -> bool {
        if let Some(n) = scanners::quote_prefix(line, 3) {
            self.child_line(block, &line[n..], depth);
            return true;
        }

        if !scanners::is_blank(line) && !scanners::is_structural(line) && lazy_continue(block, line)
        {
            return true;
        }

        false
    }

    fn list_line<'i>(&mut self, block: &mut Block<'i>, line: &[Token<'i>], depth: usize) -> bool {
        let nl = match block.value {
            NodeValue::List(nl) => nl,
            _ => unreachable!(),
        };

        if scanners::is_blank(line) {
            // Blank lines never close a list directly; they matter for
            // tightness and get forwarded so an open fence keeps them.
            if let Some(item) = block.last_open_child() {
                self.handle_line(item, line, depth + 1);
            }
            block.last_line_blank = true;
            return true;
        }

        // An indented line continues the last item, even when it looks
        // like a marker (that is how nested lists form).
        let item_indent = match block.children.last() {
            Some(item) => match item.value {
                NodeValue::Item(ni) => ni.indent,
                _ => unreachable!(),
            },
            None => 0,
        };
        let (lead_cols, _) = scanners::leading_ws(line);

        if lead_cols < item_indent || block.last_open_child().is_none() {
            if let Some(m) = scanners::list_item(line) {
                let variant = match m.detail {
                    ItemDetail::Unordered => ListVariant::Unordered,
                    ItemDetail::Task { .. } => ListVariant::Task,
                    ItemDetail::Ordered { .. } => ListVariant::Ordered,
                };
                if variant != nl.variant {
                    // A mismatched variant closes the list.
                    return false;
                }

                if block.last_line_blank {
                    self.mark_loose(block);
                }
                self.close_last_child(block);
                self.push_item(block, &m, line, depth);
                return true;
            }
        }

        let accepted = match block.last_open_child() {
            Some(item) => self.handle_line(item, line, depth + 1),
            None => false,
        };
        if accepted && block.last_line_blank {
            self.mark_loose(block);
        }
        accepted
    }

    fn mark_loose(&mut self, list: &mut Block<'_>) {
        if let NodeValue::List(ref mut nl) = list.value {
            nl.tight = false;
        }
        list.last_line_blank = false;
    }

    fn item_line<'i>(&mut self, block: &mut Block<'i>, line: &[Token<'i>], depth: usize) -> bool {
        let ni = match block.value {
            NodeValue::Item(ni) => ni,
            _ => unreachable!(),
        };

        if scanners::is_blank(line) {
            // Forward so an open fence keeps the blank; otherwise close
            // the open paragraph.
            if let Some(child) = block.last_open_child() {
                if !self.handle_line(child, line, depth + 1) {
                    self.close_last_child(block);
                }
            }
            return true;
        }

        let (lead_cols, _) = scanners::leading_ws(line);
        if lead_cols >= ni.indent {
            let (trimmed, _) = scanners::strip_indent(line, ni.indent);
            self.child_line(block, trimmed, depth);
            return true;
        }

        if !scanners::is_structural(line) && lazy_continue(block, line) {
            return true;
        }

        false
    }

    /// A fenced code block consumes everything verbatim until a closing
    /// fence of the same character, at least as long.
    fn code_line<'i>(&mut self, block: &mut Block<'i>, line: &[Token<'i>]) -> bool {
        let ncb = match block.value {
            NodeValue::CodeBlock(ref mut ncb) => ncb,
            _ => unreachable!(),
        };

        if scanners::fence_close(line, &ncb.fence) {
            block.open = false;
            return true;
        }

        for t in scanners::content_tokens(line) {
            ncb.literal.push_str(t.text);
        }
        ncb.literal.push('\n');
        true
    }

    /// A paragraph continues on any non-empty line that is not itself a
    /// new structural block.
    fn paragraph_line<'i>(&mut self, block: &mut Block<'i>, line: &[Token<'i>]) -> bool {
        if scanners::is_blank(line) || scanners::is_structural(line) {
            return false;
        }
        append_line(block, line);
        true
    }

    /// An alert continues exactly like the quote it was converted from;
    /// the body accumulates as raw tokens on the leaf.
    fn alert_line<'i>(&mut self, block: &mut Block<'i>, line: &[Token<'i>]) -> bool {
        if let Some(n) = scanners::quote_prefix(line, 3) {
            append_line(block, &line[n..]);
            return true;
        }
        if !scanners::is_blank(line) && !scanners::is_structural(line) {
            append_line(block, line);
            return true;
        }
        false
    }

    /// Open the block (or block chain) a fresh line calls for, appended
    /// under `parent`.
    fn open_new_block<'i>(&mut self, parent: &mut Block<'i>, line: &[Token<'i>], depth: usize) {
        if scanners::is_blank(line) {
            let mut b = Block::new(NodeValue::Break(NodeBreak::default()), self.row);
            b.open = false;
            parent.append(b);
            return;
        }

        if depth >= MAX_NESTING {
            trace!("nesting depth limit hit at row {}", self.row);
            self.open_paragraph(parent, line);
            return;
        }

        if scanners::thematic_break(line) {
            let mut b = Block::new(NodeValue::Break(NodeBreak { thematic: true }), self.row);
            b.open = false;
            parent.append(b);
            return;
        }

        if let Some(hm) = scanners::atx_heading(line) {
            self.open_heading(parent, line, hm);
            return;
        }

        if let Some(n) = scanners::quote_prefix(line, 3) {
            let trimmed = &line[n..];
            if let Some(severity) = scanners::alert_tag(trimmed) {
                trace!("opening alert {:?} at row {}", severity, self.row);
                let b = Block::new(NodeValue::Alert(NodeAlert { severity }), self.row);
                parent.append(b);
                return;
            }
            let mut quote = Block::new(NodeValue::Quote, self.row);
            if !scanners::is_blank(trimmed) {
                self.open_new_block(&mut quote, trimmed, depth + 1);
            }
            parent.append(quote);
            return;
        }

        if let Some(m) = scanners::list_item(line) {
            let (variant, start, checked) = match m.detail {
                ItemDetail::Unordered => (ListVariant::Unordered, 1, false),
                ItemDetail::Task { checked } => (ListVariant::Task, 1, checked),
                ItemDetail::Ordered { start } => (ListVariant::Ordered, start, false),
            };
            let mut list = Block::new(
                NodeValue::List(NodeList {
                    variant,
                    start,
                    tight: true,
                }),
                self.row,
            );
            self.push_item_with(&mut list, checked, m.indent, &line[m.content..], depth);
            parent.append(list);
            return;
        }

        if let Some(fence_at) = scanners::code_fence(line) {
            let fence_token = &scanners::content_tokens(line)[fence_at];
            let mut info = String::new();
            for t in &scanners::content_tokens(line)[fence_at + 1..] {
                info.push_str(t.text);
            }
            strings::trim(&mut info);
            if info.is_empty() {
                if let Some(ref default) = self.options.parse.default_info_string {
                    info = default.clone();
                }
            }
            let directive = directive_for(&info);
            trace!("opening fence `{}` ({}) at row {}", fence_token.text, info, self.row);
            parent.append(Block::new(
                NodeValue::CodeBlock(NodeCodeBlock {
                    fence: fence_token.text.to_string(),
                    info,
                    directive,
                    literal: String::new(),
                }),
                self.row,
            ));
            return;
        }

        self.open_paragraph(parent, line);
    }

    fn open_paragraph<'i>(&mut self, parent: &mut Block<'i>, line: &[Token<'i>]) {
        let mut para = Block::new(NodeValue::Paragraph, self.row);
        let (_, lead) = scanners::leading_ws(line);
        append_line(&mut para, &line[lead..]);
        parent.append(para);
    }

    fn open_heading<'i>(
        &mut self,
        parent: &mut Block<'i>,
        line: &[Token<'i>],
        hm: scanners::HeadingMatch,
    ) {
        let mut content = scanners::content_tokens(line)[hm.content..].to_vec();
        chop_trailing_hashes(&mut content);

        let mut heading = Block::new(
            NodeValue::Heading(NodeHeading {
                level: hm.level,
                text: String::new(),
            }),
            self.row,
        );
        heading.tokens = content;
        self.close(&mut heading);
        parent.append(heading);
    }

    fn push_item<'i>(
        &mut self,
        list: &mut Block<'i>,
        m: &scanners::ItemMatch,
        line: &[Token<'i>],
        depth: usize,
    ) {
        let checked = matches!(m.detail, ItemDetail::Task { checked: true });
        self.push_item_with(list, checked, m.indent, &line[m.content..], depth);
    }

    fn push_item_with<'i>(
        &mut self,
        list: &mut Block<'i>,
        checked: bool,
        indent: usize,
        rest: &[Token<'i>],
        depth: usize,
    ) {
        let mut item = Block::new(
            NodeValue::Item(NodeItem { checked, indent }),
            self.row,
        );
        if !scanners::is_blank(rest) {
            self.open_new_block(&mut item, rest, depth + 2);
        }
        list.append(item);
    }

    fn close_last_child(&mut self, parent: &mut Block<'_>) {
        if let Some(child) = parent.children.last_mut() {
            if child.open {
                self.close(child);
            }
        }
    }

    /// Close `block` and every open descendant. Closing a leaf triggers
    /// inline parsing of its accumulated raw tokens; a closed block is
    /// never reopened.
    fn close(&mut self, block: &mut Block<'_>) {
        if !block.open {
            return;
        }
        block.open = false;
        trace!("closing {:?} from row {}", block.value, block.start_row);

        self.close_last_child(block);

        match block.value {
            NodeValue::Paragraph | NodeValue::Alert(..) | NodeValue::TableCell => {
                block.inlines = inlines::parse(&block.tokens);
            }
            NodeValue::Heading(ref mut nh) => {
                let inlines = inlines::parse(&block.tokens);
                nh.text = crate::nodes::collect_text(&inlines);
                block.inlines = inlines;
            }
            _ => {}
        }
    }
}

/// Descend the open spine looking for a paragraph to lazily extend. Every
/// container along the way already accepted the raw line by its lazy rule
/// (non-blank, not structural), which the caller checked once.
fn lazy_continue<'i>(block: &mut Block<'i>, line: &[Token<'i>]) -> bool {
    match block.value {
        NodeValue::Paragraph => {
            append_line_trimmed(block, line);
            true
        }
        NodeValue::Document
        | NodeValue::Quote
        | NodeValue::List(..)
        | NodeValue::Item(..) => match block.last_open_child() {
            Some(child) => lazy_continue(child, line),
            None => false,
        },
        _ => false,
    }
}

/// Append a line's tokens (and its BREAK, synthesized at EOF) to a leaf.
fn append_line<'i>(block: &mut Block<'i>, line: &[Token<'i>]) {
    let content = scanners::content_tokens(line);
    block.tokens.extend_from_slice(content);
    if let Some(t) = line.last() {
        if t.kind == TokenKind::Break {
            block.tokens.push(*t);
        } else {
            block.tokens.push(Token {
                kind: TokenKind::Break,
                text: "\n",
                pos: t.pos,
            });
        }
    }
}

fn append_line_trimmed<'i>(block: &mut Block<'i>, line: &[Token<'i>]) {
    let (_, lead) = scanners::leading_ws(line);
    append_line(block, &line[lead..]);
}

/// `# Heading ##` drops the trailing hash run when a space precedes it.
fn chop_trailing_hashes(tokens: &mut Vec<Token<'_>>) {
    let mut end = tokens.len();
    while end > 0 && tokens[end - 1].is_space() {
        end -= 1;
    }
    let hashes_end = end;
    while end > 0 && tokens[end - 1].kind == TokenKind::Hash {
        end -= 1;
    }
    if end < hashes_end && (end == 0 || tokens[end - 1].is_space()) {
        tokens.truncate(end);
    } else {
        tokens.truncate(hashes_end);
    }
}

fn directive_for(info: &str) -> Option<Directive> {
    let tag = info.split_whitespace().next().unwrap_or("");
    match tag.to_ascii_lowercase().as_str() {
        "toc" | "toctree" | "table-of-contents" => Some(Directive::TableOfContents),
        _ => AlertType::from_tag(tag).map(Directive::Admonition),
    }
}
