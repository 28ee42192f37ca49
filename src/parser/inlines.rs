//! The inline parser: converts a closed leaf's raw token slice into an
//! ordered sequence of [`Inline`]s.
//!
//! One pass, with a running [`TextStyle`] accumulator and a scratch buffer
//! of pending text. Style tokens flush the scratch and toggle flags;
//! structural candidates (code spans, autolinks, links, images) scan ahead
//! and fall back to literal text when the shape does not hold.

use crate::lexer::{SourcePos, Token, TokenKind};
use crate::nodes::{Inline, InlineText, NodeImage, NodeLink, TextStyle};
use crate::strings;

// Link labels re-enter the parser; malicious nesting stops here.
const MAX_LABEL_DEPTH: usize = 16;

/// Parse a raw token slice into inlines.
pub fn parse(tokens: &[Token]) -> Vec<Inline> {
    parse_at_depth(tokens, 0)
}

fn parse_at_depth(tokens: &[Token], depth: usize) -> Vec<Inline> {
    let mut tokens = tokens;
    while tokens
        .last()
        .is_some_and(|t| t.is_space() || matches!(t.kind, TokenKind::Break | TokenKind::Eof))
    {
        tokens = &tokens[..tokens.len() - 1];
    }

    let mut p = InlineParser::new(tokens, depth);
    p.run();
    p.out
}

/// Parse a raw token slice into bare styled text runs: link labels and
/// image alt text hold no nested structure, so anything structural is
/// flattened to its visible text.
pub fn parse_text_runs(tokens: &[Token]) -> Vec<InlineText> {
    parse_text_runs_at_depth(tokens, 0)
}

fn parse_text_runs_at_depth(tokens: &[Token], depth: usize) -> Vec<InlineText> {
    let mut runs = Vec::new();
    for inline in parse_at_depth(tokens, depth) {
        match inline {
            Inline::Text(t) => runs.push(t),
            Inline::LineBreak => runs.push(InlineText {
                text: " ".to_string(),
                ..InlineText::default()
            }),
            other => {
                let mut text = String::new();
                other.push_plain_text(&mut text);
                runs.push(InlineText {
                    text,
                    ..InlineText::default()
                });
            }
        }
    }
    runs
}

struct InlineParser<'t, 'i> {
    tokens: &'t [Token<'i>],
    pos: usize,
    depth: usize,
    style: TextStyle,
    scratch: String,
    scratch_pos: Option<SourcePos>,
    out: Vec<Inline>,
}

impl<'t, 'i> InlineParser<'t, 'i> {
    fn new(tokens: &'t [Token<'i>], depth: usize) -> Self {
        InlineParser {
            tokens,
            pos: 0,
            depth,
            style: TextStyle::default(),
            scratch: String::new(),
            scratch_pos: None,
            out: Vec::new(),
        }
    }

    fn run(&mut self) {
        while self.pos < self.tokens.len() {
            let token = self.tokens[self.pos];
            match token.kind {
                TokenKind::Embold => {
                    self.flush();
                    self.style.bold = !self.style.bold;
                    self.style.italic = !self.style.italic;
                    self.pos += 1;
                }
                TokenKind::Bold => {
                    self.flush();
                    self.style.bold = !self.style.bold;
                    self.pos += 1;
                }
                TokenKind::Star => {
                    self.flush();
                    self.style.italic = !self.style.italic;
                    self.pos += 1;
                }
                TokenKind::Underscore => {
                    // Intra-word underscores do not emphasize.
                    if self.adjacent_to_words() {
                        self.push_text(token);
                        self.pos += 1;
                    } else {
                        self.flush();
                        self.style.italic = !self.style.italic;
                        self.pos += 1;
                    }
                }
                TokenKind::Tilde => {
                    self.flush();
                    self.style.strike = !self.style.strike;
                    self.pos += 1;
                    // `~~` toggles once.
                    if self.peek_kind(self.pos) == Some(TokenKind::Tilde) {
                        self.pos += 1;
                    }
                }
                TokenKind::CodeInline => self.code_span(token),
                TokenKind::LessThan => self.autolink(token),
                TokenKind::Bang => {
                    if self.peek_kind(self.pos + 1) == Some(TokenKind::OpenBracket)
                        && self.link(self.pos + 1, true)
                    {
                        // consumed by link()
                    } else {
                        self.push_text(token);
                        self.pos += 1;
                    }
                }
                TokenKind::OpenBracket => {
                    if !self.link(self.pos, false) {
                        self.push_text(token);
                        self.pos += 1;
                    }
                }
                TokenKind::Break => {
                    // Two trailing spaces make a hard break; otherwise line
                    // wrapping is the renderer's job.
                    if self.scratch.ends_with("  ") {
                        while self.scratch.ends_with(' ') {
                            self.scratch.pop();
                        }
                        self.flush();
                        self.out.push(Inline::LineBreak);
                    } else if !self.scratch.ends_with(' ') {
                        self.scratch_start(token.pos);
                        self.scratch.push(' ');
                    }
                    self.pos += 1;
                }
                TokenKind::Space => {
                    self.scratch_start(token.pos);
                    self.scratch.push(' ');
                    self.pos += 1;
                }
                TokenKind::Indent => {
                    self.scratch_start(token.pos);
                    self.scratch.push_str("  ");
                    self.pos += 1;
                }
                TokenKind::Eof => {
                    self.pos += 1;
                }
                _ => {
                    self.push_text(token);
                    self.pos += 1;
                }
            }
        }
        self.flush();
    }

    fn peek_kind(&self, at: usize) -> Option<TokenKind> {
        self.tokens.get(at).map(|t| t.kind)
    }

    fn scratch_start(&mut self, pos: SourcePos) {
        if self.scratch.is_empty() {
            self.scratch_pos = Some(pos);
        }
    }

    fn push_text(&mut self, token: Token<'i>) {
        self.scratch_start(token.pos);
        self.scratch.push_str(token.text);
    }

    fn flush(&mut self) {
        if self.scratch.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.scratch);
        let pos = self.scratch_pos.take().unwrap_or_default();
        self.out.push(Inline::Text(InlineText {
            style: self.style,
            text,
            pos,
        }));
    }

    /// Whether the tokens on both sides of the current one are words or
    /// digits.
    fn adjacent_to_words(&self) -> bool {
        let wordish = |k: Option<TokenKind>| {
            matches!(k, Some(TokenKind::Word) | Some(TokenKind::Digits))
        };
        self.pos > 0
            && wordish(Some(self.tokens[self.pos - 1].kind))
            && wordish(self.peek_kind(self.pos + 1))
    }

    /// Scan for the matching back-tick; emit a code span with collapsed
    /// internal whitespace, or the literal back-tick if unterminated.
    fn code_span(&mut self, open: Token<'i>) {
        let close = self.tokens[self.pos + 1..]
            .iter()
            .position(|t| t.kind == TokenKind::CodeInline)
            .map(|i| self.pos + 1 + i);

        match close {
            Some(close) => {
                self.flush();
                let mut body = String::new();
                for t in &self.tokens[self.pos + 1..close] {
                    body.push_str(span_text(t));
                }
                self.out
                    .push(Inline::Codespan(strings::normalize_whitespace(&body)));
                self.pos = close + 1;
            }
            None => {
                self.push_text(open);
                self.pos += 1;
            }
        }
    }

    /// `<...>` with a URL-shaped interior and no BREAK inside.
    fn autolink(&mut self, open: Token<'i>) {
        let mut close = None;
        for (i, t) in self.tokens[self.pos + 1..].iter().enumerate() {
            match t.kind {
                TokenKind::Break => break,
                TokenKind::GreaterThan => {
                    close = Some(self.pos + 1 + i);
                    break;
                }
                _ => {}
            }
        }

        let close = match close {
            Some(c) => c,
            None => {
                self.push_text(open);
                self.pos += 1;
                return;
            }
        };

        let mut interior = String::new();
        for t in &self.tokens[self.pos + 1..close] {
            interior.push_str(span_text(t));
        }

        if strings::is_url_shaped(&interior) {
            self.flush();
            self.out
                .push(Inline::Autolink(strings::clean_autolink(&interior)));
            self.pos = close + 1;
        } else {
            self.push_text(open);
            self.pos += 1;
        }
    }

    /// Validate the link shape `[...](...)`: the `]` and `(` adjacent, and
    /// the `)` before the next BREAK. Emits a Link (or an Image when
    /// `image`, with the leading `!` at `open - 1`). Returns false, having
    /// consumed nothing, when the shape does not hold.
    fn link(&mut self, open: usize, image: bool) -> bool {
        debug_assert_eq!(self.tokens[open].kind, TokenKind::OpenBracket);

        if self.depth >= MAX_LABEL_DEPTH {
            return false;
        }

        let mut close_bracket = None;
        for (i, t) in self.tokens[open + 1..].iter().enumerate() {
            match t.kind {
                TokenKind::Break => break,
                TokenKind::CloseBracket => {
                    close_bracket = Some(open + 1 + i);
                    break;
                }
                _ => {}
            }
        }
        let close_bracket = match close_bracket {
            Some(i) => i,
            None => return false,
        };

        if self.peek_kind(close_bracket + 1) != Some(TokenKind::OpenParen) {
            return false;
        }

        let mut close_paren = None;
        for (i, t) in self.tokens[close_bracket + 2..].iter().enumerate() {
            match t.kind {
                TokenKind::Break => break,
                TokenKind::CloseParen => {
                    close_paren = Some(close_bracket + 2 + i);
                    break;
                }
                _ => {}
            }
        }
        let close_paren = match close_paren {
            Some(i) => i,
            None => return false,
        };

        self.flush();

        let label = parse_text_runs_at_depth(&self.tokens[open + 1..close_bracket], self.depth + 1);
        let mut url = String::new();
        for t in &self.tokens[close_bracket + 2..close_paren] {
            url.push_str(span_text(t));
        }
        let url = strings::trim_slice(&url).to_string();

        if image {
            self.out.push(Inline::Image(NodeImage { src: url, alt: label }));
        } else {
            self.out.push(Inline::Link(NodeLink { url, text: label }));
        }

        self.pos = close_paren + 1;
        true
    }
}

/// A token's contribution to a span interior (code span body, autolink
/// interior, link URL).
fn span_text<'i>(t: &Token<'i>) -> &'i str {
    match t.kind {
        TokenKind::Break => " ",
        TokenKind::Indent => "  ",
        _ => t.text,
    }
}
