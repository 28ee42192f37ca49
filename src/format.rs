//! Canonical Markdown re-emission ("format"), used by `--inplace`
//! auto-formatting. Preserves list variants and fence marker lengths;
//! paragraph text re-wraps at the configured width.

use std::cmp::max;
use std::io::{self, Write};

use crate::nodes::{
    Block, Inline, InlineText, ListVariant, NodeValue, TableAlignment, TextStyle,
};
use crate::parser::options::Options;

/// Formats a block tree as canonical Markdown, modified by the given
/// options.
pub fn format_document(root: &Block, options: &Options, output: &mut dyn Write) -> io::Result<()> {
    let mut f = MarkdownFormatter::new(options);
    f.format_node(root);
    if !f.v.is_empty() && f.v[f.v.len() - 1] != b'\n' {
        f.v.push(b'\n');
    }
    output.write_all(&f.v)?;
    Ok(())
}

struct MarkdownFormatter<'o> {
    options: &'o Options,
    v: Vec<u8>,
    prefix: Vec<u8>,
    column: usize,
    need_cr: u8,
    last_breakable: usize,
    begin_line: bool,
    no_linebreaks: bool,
    in_table: bool,
}

#[derive(PartialEq, Clone, Copy)]
enum Escaping {
    Literal,
    Normal,
    Url,
}

impl<'o> MarkdownFormatter<'o> {
    fn new(options: &'o Options) -> Self {
        MarkdownFormatter {
            options,
            v: vec![],
            prefix: vec![],
            column: 0,
            need_cr: 0,
            last_breakable: 0,
            begin_line: true,
            no_linebreaks: false,
            in_table: false,
        }
    }

    fn output(&mut self, buf: &[u8], wrap: bool, escaping: Escaping) {
        let wrap = wrap && !self.no_linebreaks;

        let mut k = self.v.len() as i32 - 1;
        while self.need_cr > 0 {
            if k < 0 || self.v[k as usize] == b'\n' {
                k -= 1;
            } else {
                self.v.push(b'\n');
                if self.need_cr > 1 {
                    self.v.extend(&self.prefix);
                }
            }
            self.column = 0;
            self.last_breakable = 0;
            self.begin_line = true;
            self.need_cr -= 1;
        }

        let mut i = 0;
        while i < buf.len() {
            if self.begin_line {
                self.v.extend(&self.prefix);
                self.column = self.prefix.len();
            }

            let nextc = buf.get(i + 1);
            if buf[i] == b' ' && wrap {
                if !self.begin_line {
                    let last_nonspace = self.v.len();
                    self.v.push(b' ');
                    self.column += 1;
                    self.begin_line = false;
                    while buf.get(i + 1) == Some(&b' ') {
                        i += 1;
                    }
                    if !buf.get(i + 1).map_or(false, u8::is_ascii_digit) {
                        self.last_breakable = last_nonspace;
                    }
                }
            } else if escaping == Escaping::Literal {
                if buf[i] == b'\n' {
                    self.v.push(b'\n');
                    self.column = 0;
                    self.begin_line = true;
                    self.last_breakable = 0;
                } else {
                    self.v.push(buf[i]);
                    self.column += 1;
                    self.begin_line = false;
                }
            } else {
                self.outc(buf[i], escaping, nextc);
                self.begin_line = false;
            }

            if self.options.render.width > 0
                && self.column > self.options.render.width
                && !self.begin_line
                && self.last_breakable > 0
            {
                let remainder = self.v[self.last_breakable + 1..].to_vec();
                self.v.truncate(self.last_breakable);
                self.v.push(b'\n');
                self.v.extend(&self.prefix);
                self.v.extend(&remainder);
                self.column = self.prefix.len() + remainder.len();
                self.last_breakable = 0;
                self.begin_line = false;
            }

            i += 1;
        }
    }

    // The dialect has no general backslash-escape rule, so escaped text
    // would not round-trip; the only escapable byte is a pipe inside a
    // table cell, plus URL cleanup. Everything else passes through.
    fn outc(&mut self, c: u8, escaping: Escaping, _nextc: Option<&u8>) {
        let needs_escaping = c < 0x80
            && escaping != Escaping::Literal
            && ((escaping == Escaping::Normal && c == b'|' && self.in_table)
                || (escaping == Escaping::Url
                    && (c.is_ascii_whitespace() || c == b')' || c == b'(')));

        if needs_escaping {
            if escaping == Escaping::Url {
                write!(self.v, "%{:02X}", c).unwrap();
                self.column += 3;
            } else if c.is_ascii_punctuation() {
                write!(self.v, "\\{}", c as char).unwrap();
                self.column += 2;
            } else {
                self.v.push(c);
                self.column += 1;
            }
        } else {
            self.v.push(c);
            self.column += 1;
        }
    }

    fn cr(&mut self) {
        self.need_cr = max(self.need_cr, 1);
    }

    fn blankline(&mut self) {
        self.need_cr = max(self.need_cr, 2);
    }

    fn literal(&mut self, s: &str) {
        self.output(s.as_bytes(), false, Escaping::Literal);
    }

    fn format_node(&mut self, node: &Block) {
        match node.value {
            NodeValue::Document => {
                for child in &node.children {
                    self.format_node(child);
                }
            }
            NodeValue::Quote => self.format_quote(node),
            NodeValue::List(..) => self.format_list(node),
            NodeValue::Table(..) => self.format_table(node),
            NodeValue::Break(ref nb) => {
                if nb.thematic {
                    self.blankline();
                    self.literal("---");
                    self.blankline();
                }
            }
            NodeValue::CodeBlock(..) => self.format_code_block(node),
            NodeValue::Heading(..) => self.format_heading(node),
            NodeValue::Paragraph => self.format_paragraph(node),
            NodeValue::Alert(..) => self.format_alert(node),
            NodeValue::Item(..) | NodeValue::TableRow(..) | NodeValue::TableCell => {
                unreachable!("formatted by the enclosing container")
            }
        }
    }

    fn format_quote(&mut self, node: &Block) {
        self.literal("> ");
        write!(self.prefix, "> ").unwrap();
        for child in &node.children {
            self.format_node(child);
        }
        let new_len = self.prefix.len() - 2;
        self.prefix.truncate(new_len);
        self.blankline();
    }

    fn format_list(&mut self, node: &Block) {
        let nl = match node.value {
            NodeValue::List(nl) => nl,
            _ => unreachable!(),
        };

        let items: Vec<&Block> = node
            .children
            .iter()
            .filter(|c| matches!(c.value, NodeValue::Item(..)))
            .collect();

        for (i, item) in items.iter().enumerate() {
            let marker = match nl.variant {
                ListVariant::Unordered => "- ".to_string(),
                ListVariant::Task => {
                    let checked = match item.value {
                        NodeValue::Item(ni) => ni.checked,
                        _ => unreachable!(),
                    };
                    if checked {
                        "- [x] ".to_string()
                    } else {
                        "- [ ] ".to_string()
                    }
                }
                ListVariant::Ordered => format!("{}. ", nl.start + i),
            };

            self.cr();
            self.literal(&marker);
            for _ in 0..marker.len() {
                self.prefix.push(b' ');
            }

            for child in &item.children {
                self.format_node(child);
            }
            if nl.tight {
                self.need_cr = self.need_cr.min(1);
            }

            let new_len = self.prefix.len() - marker.len();
            self.prefix.truncate(new_len);
            self.cr();
            if !nl.tight {
                self.blankline();
            }
        }
        self.blankline();
    }

    fn format_heading(&mut self, node: &Block) {
        let level = match node.value {
            NodeValue::Heading(ref nh) => nh.level,
            _ => unreachable!(),
        };
        for _ in 0..level {
            self.literal("#");
        }
        self.literal(" ");
        self.no_linebreaks = true;
        self.format_inlines(&node.inlines, true);
        self.no_linebreaks = false;
        self.blankline();
    }

    fn format_code_block(&mut self, node: &Block) {
        let ncb = match node.value {
            NodeValue::CodeBlock(ref ncb) => ncb,
            _ => unreachable!(),
        };

        self.blankline();

        // Keep the author's fence, growing it if the body now needs more.
        let numticks = max(ncb.fence.len(), longest_char_sequence(ncb.literal.as_bytes(), b'`') + 1)
            .max(3);
        let fence = "`".repeat(numticks);
        self.literal(&fence);
        if !ncb.info.is_empty() {
            self.literal(" ");
            self.literal(&ncb.info);
        }
        self.cr();
        self.literal(&ncb.literal);
        self.cr();
        self.literal(&fence);
        self.blankline();
    }

    fn format_paragraph(&mut self, node: &Block) {
        self.format_inlines(&node.inlines, true);
        self.blankline();
    }

    fn format_alert(&mut self, node: &Block) {
        let severity = match node.value {
            NodeValue::Alert(ref na) => na.severity,
            _ => unreachable!(),
        };

        self.literal("> ");
        self.literal(&format!("[!{}]", severity.default_title().to_uppercase()));
        self.cr();
        write!(self.prefix, "> ").unwrap();
        self.cr();
        self.format_inlines(&node.inlines, true);
        let new_len = self.prefix.len() - 2;
        self.prefix.truncate(new_len);
        self.blankline();
    }

    fn format_table(&mut self, node: &Block) {
        let alignments = match node.value {
            NodeValue::Table(ref nt) => nt.alignments.clone(),
            _ => unreachable!(),
        };

        self.blankline();
        self.no_linebreaks = true;
        self.in_table = true;

        for row in &node.children {
            let header = matches!(row.value, NodeValue::TableRow(true));
            self.cr();
            self.literal("|");
            for cell in &row.children {
                self.literal(" ");
                self.format_inlines(&cell.inlines, false);
                self.literal(" |");
            }

            if header {
                self.cr();
                self.literal("|");
                for a in &alignments {
                    self.literal(match *a {
                        TableAlignment::Left => " :-- |",
                        TableAlignment::Center => " :-: |",
                        TableAlignment::Right => " --: |",
                        TableAlignment::None => " --- |",
                    });
                }
            }
        }

        self.no_linebreaks = false;
        self.in_table = false;
        self.blankline();
    }

    // ---- inlines ----

    /// Emit the inline sequence, re-deriving emphasis markers from style
    /// transitions between adjacent text runs.
    fn format_inlines(&mut self, inlines: &[Inline], allow_wrap: bool) {
        let allow_wrap = allow_wrap && self.options.render.width > 0;
        let mut cur = TextStyle::default();

        for inline in inlines {
            match *inline {
                Inline::Text(ref t) => {
                    self.style_markers(&cur, &t.style);
                    cur = t.style;
                    self.output(t.text.as_bytes(), allow_wrap, Escaping::Normal);
                }
                Inline::Codespan(ref body) => {
                    self.style_markers(&cur, &TextStyle::default());
                    cur = TextStyle::default();
                    self.format_codespan(body, allow_wrap);
                }
                Inline::Autolink(ref url) => {
                    self.style_markers(&cur, &TextStyle::default());
                    cur = TextStyle::default();
                    self.literal("<");
                    let stripped = url.strip_prefix("mailto:").unwrap_or(url);
                    self.output(stripped.as_bytes(), false, Escaping::Literal);
                    self.literal(">");
                }
                Inline::Link(ref nl) => {
                    self.style_markers(&cur, &TextStyle::default());
                    cur = TextStyle::default();
                    self.literal("[");
                    self.format_text_runs(&nl.text, allow_wrap);
                    self.literal("](");
                    self.output(nl.url.as_bytes(), false, Escaping::Url);
                    self.literal(")");
                }
                Inline::Image(ref ni) => {
                    self.style_markers(&cur, &TextStyle::default());
                    cur = TextStyle::default();
                    self.literal("![");
                    self.format_text_runs(&ni.alt, allow_wrap);
                    self.literal("](");
                    self.output(ni.src.as_bytes(), false, Escaping::Url);
                    self.literal(")");
                }
                Inline::LineBreak => {
                    self.style_markers(&cur, &TextStyle::default());
                    cur = TextStyle::default();
                    self.literal("  ");
                    self.cr();
                }
            }
        }

        self.style_markers(&cur, &TextStyle::default());
    }

    fn format_text_runs(&mut self, runs: &[InlineText], allow_wrap: bool) {
        let mut cur = TextStyle::default();
        for run in runs {
            self.style_markers(&cur, &run.style);
            cur = run.style;
            self.output(run.text.as_bytes(), allow_wrap, Escaping::Normal);
        }
        self.style_markers(&cur, &TextStyle::default());
    }

    /// The emphasis markers that take `from` to `to`. Each flag is a
    /// toggle in the dialect, so a bare diff round-trips.
    fn style_markers(&mut self, from: &TextStyle, to: &TextStyle) {
        if from.bold != to.bold {
            self.literal("**");
        }
        if from.italic != to.italic {
            self.literal("*");
        }
        if from.strike != to.strike {
            self.literal("~~");
        }
    }

    fn format_codespan(&mut self, body: &str, allow_wrap: bool) {
        let literal = body.as_bytes();
        let numticks = shortest_unused_sequence(literal, b'`');
        for _ in 0..numticks {
            self.literal("`");
        }

        let pad = !literal.is_empty()
            && (literal[0] == b'`'
                || literal[literal.len() - 1] == b'`'
                || literal[0] == b' '
                || literal[literal.len() - 1] == b' ');
        if pad {
            self.literal(" ");
        }
        self.output(literal, allow_wrap, Escaping::Literal);
        if pad {
            self.literal(" ");
        }
        for _ in 0..numticks {
            self.literal("`");
        }
    }
}

fn longest_char_sequence(literal: &[u8], ch: u8) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in literal {
        if *c == ch {
            current += 1;
        } else {
            if current > longest {
                longest = current;
            }
            current = 0;
        }
    }
    if current > longest {
        longest = current;
    }
    longest
}

fn shortest_unused_sequence(literal: &[u8], f: u8) -> usize {
    let mut used = 1;
    let mut current = 0;
    for c in literal {
        if *c == f {
            current += 1;
        } else {
            if current > 0 {
                used |= 1 << current;
            }
            current = 0;
        }
    }

    if current > 0 {
        used |= 1 << current;
    }

    let mut i = 0;
    while used & 1 != 0 {
        used >>= 1;
        i += 1;
    }
    i
}
