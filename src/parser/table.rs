//! Paragraph→table reinterpretation.
//!
//! A paragraph whose first line contains an unescaped `|` becomes a table
//! when its second line is a column-alignment row. The header row fixes
//! the column count; body rows are padded or truncated to it.

use crate::lexer::{Token, TokenKind};
use crate::nodes::{Block, NodeTable, NodeValue};
use crate::parser::inlines;
use crate::scanners;

/// If `parent`'s last child is a single-line open paragraph with an
/// unescaped pipe and `line` is a matching separator row, replace the
/// paragraph with an open Table holding the header row. Returns whether
/// the reinterpretation happened (consuming `line`).
pub fn try_convert<'i>(parent: &mut Block<'i>, line: &[Token<'i>]) -> bool {
    let para = match parent.children.last() {
        Some(child) if child.open && matches!(child.value, NodeValue::Paragraph) => child,
        _ => return false,
    };

    // "First line": the paragraph must hold exactly one line so far.
    let breaks = para
        .tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Break)
        .count();
    let single_line = match breaks {
        0 => true,
        1 => para.tokens.last().map(|t| t.kind) == Some(TokenKind::Break),
        _ => false,
    };
    if !single_line || !scanners::has_unescaped_pipe(&para.tokens) {
        return false;
    }

    let alignments = match scanners::table_separator_row(line) {
        Some(a) => a,
        None => return false,
    };

    let header = match scanners::split_table_row(&para.tokens) {
        Some(cells) => cells,
        None => return false,
    };
    if header.len() != alignments.len() {
        return false;
    }

    let start_row = para.start_row;
    let ncol = header.len();
    let mut table = Block::new(
        NodeValue::Table(NodeTable { ncol, alignments }),
        start_row,
    );

    let mut header_row = Block::new(NodeValue::TableRow(true), start_row);
    for cell in header {
        header_row.append(make_cell(cell, start_row));
    }
    header_row.open = false;
    table.append(header_row);

    parent.children.pop();
    parent.append(table);
    true
}

/// A line handed to an open Table: a row line extends it, anything else
/// rejects so the table closes.
pub fn handle_line<'i>(table: &mut Block<'i>, line: &[Token<'i>], row: usize) -> bool {
    if scanners::is_blank(line) {
        return false;
    }

    let ncol = match table.value {
        NodeValue::Table(ref nt) => nt.ncol,
        _ => unreachable!(),
    };

    let cells = match scanners::split_table_row(line) {
        Some(cells) => cells,
        None => return false,
    };

    let mut table_row = Block::new(NodeValue::TableRow(false), row);
    for cell in cells.iter().take(ncol) {
        table_row.append(make_cell(cell, row));
    }
    // Column count is fixed by the header; short rows pad out with empty
    // cells.
    for _ in cells.len()..ncol {
        table_row.append(make_cell(&[], row));
    }
    table_row.open = false;
    table.append(table_row);
    true
}

/// Cells close (and inline-parse) immediately so only the table itself
/// stays open.
fn make_cell<'i>(tokens: &[Token<'i>], row: usize) -> Block<'i> {
    let mut cell = Block::new(NodeValue::TableCell, row);
    let trimmed = trim_cell(tokens);
    // `\|` carried a pipe through the row split; drop the backslash.
    cell.tokens = trimmed
        .iter()
        .enumerate()
        .filter(|(i, t)| {
            !(t.kind == TokenKind::Backslash
                && trimmed.get(i + 1).map(|n| n.kind) == Some(TokenKind::Pipe))
        })
        .map(|(_, t)| *t)
        .collect();
    cell.inlines = inlines::parse(&cell.tokens);
    cell.open = false;
    cell
}

fn trim_cell<'t, 'i>(mut tokens: &'t [Token<'i>]) -> &'t [Token<'i>] {
    while tokens.first().is_some_and(|t| t.is_space()) {
        tokens = &tokens[1..];
    }
    while tokens.last().is_some_and(|t| t.is_space()) {
        tokens = &tokens[..tokens.len() - 1];
    }
    tokens
}
