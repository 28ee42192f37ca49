/*!
  Line-shape predicates for the block parser.

  Every scanner takes one logical line as a token slice (trailing BREAK
  included) and decides a single question about its shape, cheaply: the
  first token rules most shapes out before any deeper scan happens. The
  block parser trims container markers and indentation before asking, so
  the patterns here only tolerate the small leading-space allowances the
  dialect grants (two for markers, three for quote continuation).
*/

use crate::lexer::{Token, TokenKind};
use crate::nodes::TableAlignment;
use crate::parser::alert::AlertType;

/// A matched ATX heading opener.
pub struct HeadingMatch {
    /// Heading level, 1..=6.
    pub level: u32,
    /// Index of the first content token.
    pub content: usize,
}

/// A matched list-item marker.
pub struct ItemMatch {
    /// Index of the first content token, past the marker and its trailing
    /// spaces.
    pub content: usize,
    /// The item's left edge in columns, marker and trailing spaces
    /// included.
    pub indent: usize,
    /// For ordered items, the numeral; for task items, the checkbox
    /// state.
    pub detail: ItemDetail,
}

/// What kind of item marker matched.
pub enum ItemDetail {
    Unordered,
    Task { checked: bool },
    Ordered { start: usize },
}

/// Strip the trailing BREAK/EOF, yielding the line's content tokens.
pub fn content_tokens<'t, 'i>(line: &'t [Token<'i>]) -> &'t [Token<'i>] {
    match line.last() {
        Some(t) if matches!(t.kind, TokenKind::Break | TokenKind::Eof) => {
            &line[..line.len() - 1]
        }
        _ => line,
    }
}

/// Whether the line holds nothing but whitespace.
pub fn is_blank(line: &[Token]) -> bool {
    content_tokens(line).iter().all(|t| t.is_space())
}

/// The leading whitespace of the line: `(columns, tokens)`.
pub fn leading_ws(line: &[Token]) -> (usize, usize) {
    let mut cols = 0;
    let mut n = 0;
    for t in line {
        if !t.is_space() {
            break;
        }
        cols += t.ws_cols();
        n += 1;
    }
    (cols, n)
}

/// Strip up to `max_cols` columns of leading whitespace. An INDENT
/// straddling the budget is consumed whole. Returns the trimmed line and
/// the number of columns actually stripped.
pub fn strip_indent<'t, 'i>(line: &'t [Token<'i>], max_cols: usize) -> (&'t [Token<'i>], usize) {
    let mut cols = 0;
    let mut n = 0;
    for t in line {
        if !t.is_space() || cols >= max_cols {
            break;
        }
        cols += t.ws_cols();
        n += 1;
    }
    (&line[n..], cols)
}

fn skip_spaces(line: &[Token], mut i: usize, max: usize) -> usize {
    let mut cols = 0;
    while i < line.len() && line[i].is_space() && cols < max {
        cols += line[i].ws_cols();
        i += 1;
    }
    i
}

/// `#{1..6} ' '+ …` — an ATX heading opener, tolerating up to three
/// columns of indent.
pub fn atx_heading(line: &[Token]) -> Option<HeadingMatch> {
    let line = content_tokens(line);
    let (lead_cols, lead) = leading_ws(line);
    if lead_cols > 3 {
        return None;
    }
    let line = &line[lead..];
    if line.first().map(|t| t.kind) != Some(TokenKind::Hash) {
        return None;
    }
    let mut level = 0usize;
    while level < line.len() && line[level].kind == TokenKind::Hash {
        level += 1;
    }
    if level > 6 {
        return None;
    }
    // Either at least one space before content, or nothing at all ("#").
    if level < line.len() && !line[level].is_space() {
        return None;
    }
    let mut content = level;
    while content < line.len() && line[content].is_space() {
        content += 1;
    }
    Some(HeadingMatch {
        level: level as u32,
        // Index into the unstripped line.
        content: lead + content,
    })
}

/// `[ ]{0..2} [-+*] ' '+`, optionally followed by a `[ ] `/`[x] ` task
/// checkbox, or `[ ]{0..2} [0-9]+ '.' ' '+` for ordered items.
pub fn list_item(line: &[Token]) -> Option<ItemMatch> {
    let line = content_tokens(line);
    let (lead_cols, lead) = leading_ws(line);
    if lead_cols > 2 || lead >= line.len() {
        return None;
    }
    let marker = &line[lead];

    match marker.kind {
        TokenKind::Minus | TokenKind::Plus | TokenKind::Star => {
            let mut i = lead + 1;
            if i >= line.len() || !line[i].is_space() {
                return None;
            }
            let mut marker_cols = lead_cols + 1;
            while i < line.len() && line[i].is_space() {
                marker_cols += line[i].ws_cols();
                i += 1;
            }
            if let Some((checked, rest, extra)) = task_checkbox(&line[i..]) {
                return Some(ItemMatch {
                    content: i + rest,
                    indent: marker_cols + extra,
                    detail: ItemDetail::Task { checked },
                });
            }
            Some(ItemMatch {
                content: i,
                indent: marker_cols,
                detail: ItemDetail::Unordered,
            })
        }
        TokenKind::Digits => {
            // Marker width is digits + period + following whitespace,
            // however many digits the numeral has.
            if line.get(lead + 1).map(|t| t.kind) != Some(TokenKind::Period) {
                return None;
            }
            let mut i = lead + 2;
            if i >= line.len() || !line[i].is_space() {
                return None;
            }
            let mut marker_cols = lead_cols + marker.text.chars().count() + 1;
            while i < line.len() && line[i].is_space() {
                marker_cols += line[i].ws_cols();
                i += 1;
            }
            let start = marker.text.parse().unwrap_or(1);
            Some(ItemMatch {
                content: i,
                indent: marker_cols,
                detail: ItemDetail::Ordered { start },
            })
        }
        _ => None,
    }
}

/// `'[' . ']' ' '+` — the task checkbox after a bullet marker. Returns
/// the checkbox state, tokens consumed, and columns consumed.
fn task_checkbox(line: &[Token]) -> Option<(bool, usize, usize)> {
    if line.first().map(|t| t.kind) != Some(TokenKind::OpenBracket) {
        return None;
    }
    let state = line.get(1)?;
    let checked = match state.kind {
        TokenKind::Space => false,
        TokenKind::Word if state.text.eq_ignore_ascii_case("x") => true,
        _ => return None,
    };
    if line.get(2)?.kind != TokenKind::CloseBracket {
        return None;
    }
    if !line.get(3).is_some_and(|t| t.is_space()) {
        return None;
    }
    let mut i = 3;
    let mut cols = 3;
    while i < line.len() && line[i].is_space() {
        cols += line[i].ws_cols();
        i += 1;
    }
    Some((checked, i, cols))
}

/// `[ ]{0..max_spaces} '>' ' '?` — a quote marker. Returns the number of
/// tokens to trim (marker plus one optional space).
pub fn quote_prefix(line: &[Token], max_spaces: usize) -> Option<usize> {
    let line_c = content_tokens(line);
    let i = skip_spaces(line_c, 0, max_spaces);
    if line_c.get(i).map(|t| t.kind) != Some(TokenKind::GreaterThan) {
        return None;
    }
    let mut n = i + 1;
    if line_c.get(n).is_some_and(|t| t.kind == TokenKind::Space) {
        n += 1;
    }
    Some(n)
}

/// Leading whitespace followed by a DIRECTIVE run — a code fence opener.
/// Returns the fence token index.
pub fn code_fence(line: &[Token]) -> Option<usize> {
    let line = content_tokens(line);
    let (_, lead) = leading_ws(line);
    match line.get(lead) {
        Some(t) if t.kind == TokenKind::Directive => Some(lead),
        _ => None,
    }
}

/// Whether the line closes a fence opened with `fence`: a DIRECTIVE of the
/// same character at least as long, as the first non-whitespace token,
/// with nothing but whitespace after.
pub fn fence_close(line: &[Token], fence: &str) -> bool {
    let line = content_tokens(line);
    let (_, lead) = leading_ws(line);
    match line.get(lead) {
        Some(t) if t.kind == TokenKind::Directive => {
            t.text.len() >= fence.len()
                && t.text.as_bytes().first() == fence.as_bytes().first()
                && line[lead + 1..].iter().all(|t| t.is_space())
        }
        _ => false,
    }
}

/// Three or more `-`, `*` or `_` of a single character, optionally space
/// separated, and nothing else — a thematic break.
pub fn thematic_break(line: &[Token]) -> bool {
    let line = content_tokens(line);
    let mut marker = 0u8;
    let mut count = 0usize;
    for t in line {
        if t.is_space() {
            continue;
        }
        let (c, n) = match t.kind {
            TokenKind::Minus => (b'-', 1),
            TokenKind::Star => (b'*', 1),
            TokenKind::Underscore => (b'_', 1),
            TokenKind::Bold | TokenKind::Embold => {
                (t.text.as_bytes()[0], t.text.len())
            }
            _ => return false,
        };
        // Mixed EMBOLDs like **_ never form a break.
        if t.text.bytes().any(|b| b != c) {
            return false;
        }
        if marker == 0 {
            marker = c;
        } else if marker != c {
            return false;
        }
        count += n;
    }
    marker != 0 && count >= 3
}

/// `'[!' WORD ']'` with a known severity, and nothing else on the line.
pub fn alert_tag(line: &[Token]) -> Option<AlertType> {
    let line = content_tokens(line);
    let (_, lead) = leading_ws(line);
    let line = &line[lead..];
    if line.first().map(|t| t.kind) != Some(TokenKind::OpenBracket) {
        return None;
    }
    if line.get(1).map(|t| t.kind) != Some(TokenKind::Bang) {
        return None;
    }
    let word = match line.get(2) {
        Some(t) if t.kind == TokenKind::Word => t.text,
        _ => return None,
    };
    if line.get(3).map(|t| t.kind) != Some(TokenKind::CloseBracket) {
        return None;
    }
    if !line[4..].iter().all(|t| t.is_space()) {
        return None;
    }
    AlertType::from_tag(word)
}

/// Whether the line contains a `|` not preceded by a backslash.
pub fn has_unescaped_pipe(line: &[Token]) -> bool {
    let line = content_tokens(line);
    for (i, t) in line.iter().enumerate() {
        if t.kind == TokenKind::Pipe
            && (i == 0 || line[i - 1].kind != TokenKind::Backslash)
        {
            return true;
        }
    }
    false
}

/// `[ ]*[:]?-+[:]?[ ]*` cells separated by pipes — a table separator row.
/// Returns one alignment per column.
pub fn table_separator_row(line: &[Token]) -> Option<Vec<TableAlignment>> {
    let cells = split_table_row(line)?;
    let mut alignments = Vec::with_capacity(cells.len());

    // The colon is not structural punctuation, so it arrives as a
    // one-character WORD here.
    fn is_colon(t: &Token) -> bool {
        t.kind == TokenKind::Word && t.text == ":"
    }

    for cell in &cells {
        let cell: Vec<&Token> = cell.iter().filter(|t| !t.is_space()).collect();
        if cell.is_empty() {
            return None;
        }
        let left = cell.first().is_some_and(|t| is_colon(t));
        let right = cell.len() > 1 && cell.last().is_some_and(|t| is_colon(t));
        let dashes = &cell[left as usize..cell.len() - (right as usize)];
        if dashes.is_empty() || dashes.iter().any(|t| t.kind != TokenKind::Minus) {
            return None;
        }
        alignments.push(if left && right {
            TableAlignment::Center
        } else if left {
            TableAlignment::Left
        } else if right {
            TableAlignment::Right
        } else {
            TableAlignment::None
        });
    }

    Some(alignments)
}

/// Split a line on unescaped pipes into cell token slices. Leading and
/// trailing pipes delimit rather than produce empty edge cells. Returns
/// `None` for a line with no pipe at all.
pub fn split_table_row<'t, 'i>(line: &'t [Token<'i>]) -> Option<Vec<&'t [Token<'i>]>> {
    let line = content_tokens(line);
    let (_, lead) = leading_ws(line);
    let line = &line[lead..];
    if !has_unescaped_pipe(line) {
        return None;
    }

    let mut cells = Vec::new();
    let mut cell_start = 0;
    for (i, t) in line.iter().enumerate() {
        if t.kind == TokenKind::Pipe && (i == 0 || line[i - 1].kind != TokenKind::Backslash) {
            if i > cell_start || (cell_start > 0 && i == cell_start) {
                cells.push(&line[cell_start..i]);
            }
            cell_start = i + 1;
        }
    }
    if cell_start < line.len() {
        let tail = &line[cell_start..];
        if !tail.iter().all(|t| t.is_space()) {
            cells.push(tail);
        }
    }

    if cells.is_empty() {
        None
    } else {
        Some(cells)
    }
}

/// Whether the line would open a structural block in any context. Lazy
/// continuation only applies to lines that would not.
pub fn is_structural(line: &[Token]) -> bool {
    atx_heading(line).is_some()
        || list_item(line).is_some()
        || quote_prefix(line, 3).is_some()
        || code_fence(line).is_some()
        || thematic_break(line)
}
