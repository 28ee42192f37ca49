//! The console renderer: ANSI-styled, width-wrapped terminal output.
//!
//! The formatter owns a small line machine: `column` counts code points
//! written on the current line, `leaders` is the stack of container
//! prefixes re-emitted after every line break, and `cur_style` is the SGR
//! state actually on the wire, updated through a minimizing diff so only
//! changed attributes cost escape bytes. Everything else (boxes, tables,
//! images, hyperlinks) is built on those primitives.

pub mod graphics;

use std::io::{self, Write};

use log::debug;
use smallvec::SmallVec;

use crate::adapters::{is_png, HighlightSpan};
use crate::nodes::{
    Block, Color, Directive, Inline, InlineText, ListVariant, NodeValue, TableAlignment,
    TextStyle,
};
use crate::parser::alert::AlertType;
use crate::parser::options::{Options, Plugins};
use crate::strings;
use crate::toc;

/// The bullet marker for unordered list items.
const BULLET: &str = "‣";
/// Task list markers, by checkbox state.
const TASK_DONE: &str = "☑";
const TASK_OPEN: &str = "☐";

/// Formats a block tree as ANSI console output, modified by the given
/// options.
pub fn format_document(root: &Block, options: &Options, output: &mut dyn Write) -> io::Result<()> {
    format_document_with_plugins(root, options, output, &Plugins::default())
}

/// Formats a block tree as ANSI console output. Accepts plugins for
/// syntax highlighting and image decoding.
pub fn format_document_with_plugins(
    root: &Block,
    options: &Options,
    output: &mut dyn Write,
    plugins: &Plugins,
) -> io::Result<()> {
    let mut f = ConsoleFormatter::new(output, options, plugins, root);
    f.format_node(root)?;
    f.reset_style()?;
    Ok(())
}

#[derive(Clone)]
struct Leader {
    text: String,
    style: TextStyle,
}

struct ConsoleFormatter<'o, 'p, 'i> {
    output: &'o mut dyn Write,
    options: &'o Options,
    plugins: &'o Plugins<'p>,
    document: &'o Block<'i>,

    /// Current output column, counted in code points.
    column: usize,
    leaders: SmallVec<[Leader; 8]>,
    cur_style: TextStyle,
    style_override: Option<TextStyle>,
    /// A right-edge decoration written before each line break (the ` │`
    /// of an alert box).
    trailer: Option<Leader>,
    needs_leaders: bool,
    pending_space: bool,
}

impl<'o, 'p, 'i> ConsoleFormatter<'o, 'p, 'i> {
    fn new(
        output: &'o mut dyn Write,
        options: &'o Options,
        plugins: &'o Plugins<'p>,
        document: &'o Block<'i>,
    ) -> Self {
        ConsoleFormatter {
            output,
            options,
            plugins,
            document,
            column: 0,
            leaders: SmallVec::new(),
            cur_style: TextStyle::default(),
            style_override: None,
            trailer: None,
            needs_leaders: true,
            pending_space: false,
        }
    }

    // ---- line machinery ----

    fn width(&self) -> usize {
        self.options.render.width
    }

    /// The wrap limit for content: the target width, shortened by the
    /// trailer when one is active.
    fn wrap_limit(&self) -> usize {
        let trailer = self
            .trailer
            .as_ref()
            .map_or(0, |t| t.text.chars().count());
        self.width().saturating_sub(trailer)
    }

    /// The column content starts at on a fresh line: margin plus leaders.
    fn line_base(&self) -> usize {
        self.options.render.indent
            + self
                .leaders
                .iter()
                .map(|l| l.text.chars().count())
                .sum::<usize>()
    }

    fn write_raw(&mut self, s: &str) -> io::Result<()> {
        self.output.write_all(s.as_bytes())
    }

    /// Write `text` in `style`, advancing the column. No wrapping.
    fn write_styled(&mut self, text: &str, style: TextStyle) -> io::Result<()> {
        self.start_style(style)?;
        self.write_raw(text)?;
        self.column += text.chars().count();
        Ok(())
    }

    /// Start a fresh line's prefix: the left margin, then the leader
    /// stack, top to bottom.
    fn write_leaders(&mut self) -> io::Result<()> {
        if !self.needs_leaders {
            return Ok(());
        }
        self.needs_leaders = false;

        if self.options.render.indent > 0 {
            let margin = " ".repeat(self.options.render.indent);
            self.reset_style()?;
            self.write_raw(&margin)?;
            self.column += self.options.render.indent;
        }
        let leaders = self.leaders.clone();
        for leader in &leaders {
            self.write_styled(&leader.text, leader.style)?;
        }
        Ok(())
    }

    /// End the line: pad and draw the trailer when one is set, clear to
    /// the end of the line (unless buffered), and write the newline.
    fn line_break(&mut self) -> io::Result<()> {
        if let Some(trailer) = self.trailer.clone() {
            let tw = trailer.text.chars().count();
            let pad = self.width().saturating_sub(self.column + tw);
            if pad > 0 {
                self.reset_style()?;
                self.write_raw(&" ".repeat(pad))?;
                self.column += pad;
            }
            self.write_styled(&trailer.text, trailer.style)?;
        }
        self.reset_style()?;
        if !self.options.render.buffered {
            self.write_raw("\x1b[0K")?;
        }
        self.write_raw("\n")?;
        self.column = 0;
        self.needs_leaders = true;
        self.pending_space = false;
        Ok(())
    }

    /// A line holding nothing but the leader prefix.
    fn blank_line(&mut self) -> io::Result<()> {
        self.write_leaders()?;
        self.line_break()
    }

    fn push_leader(&mut self, text: &str, style: TextStyle) {
        self.leaders.push(Leader {
            text: text.to_string(),
            style,
        });
    }

    fn pop_leader(&mut self) {
        self.leaders.pop();
    }

    // ---- style minimization ----

    /// Emit only the SGR parameters that differ from the current state.
    fn start_style(&mut self, new: TextStyle) -> io::Result<()> {
        if new == self.cur_style {
            return Ok(());
        }

        let cur = self.cur_style;
        let mut params: SmallVec<[String; 4]> = SmallVec::new();
        let flags = [
            (cur.bold, new.bold, "1", "22"),
            (cur.italic, new.italic, "3", "23"),
            (cur.underline, new.underline, "4", "24"),
            (cur.blink, new.blink, "5", "25"),
            (cur.reverse, new.reverse, "7", "27"),
            (cur.hide, new.hide, "8", "28"),
            (cur.strike, new.strike, "9", "29"),
        ];
        for (was, is, on, off) in flags {
            if was != is {
                params.push(if is { on.to_string() } else { off.to_string() });
            }
        }
        if cur.fg != new.fg {
            params.push(new.fg.sgr_fg());
        }
        if cur.bg != new.bg {
            params.push(new.bg.sgr_bg());
        }

        if !params.is_empty() {
            self.write_raw(&format!("\x1b[{}m", params.join(";")))?;
        }
        self.cur_style = new;
        Ok(())
    }

    fn reset_style(&mut self) -> io::Result<()> {
        if self.cur_style != TextStyle::default() {
            self.write_raw("\x1b[m")?;
            self.cur_style = TextStyle::default();
        }
        Ok(())
    }

    // ---- word wrapping ----

    /// Write `text` with word wrapping against the target width. Words
    /// are whatever sits between ASCII spaces; embedded newlines force a
    /// break. The active style override is layered on top of `style`.
    fn wrap_text(&mut self, text: &str, style: TextStyle) -> io::Result<()> {
        let style = match self.style_override {
            Some(over) => style.union(&over),
            None => style,
        };

        for (i, seg) in text.split('\n').enumerate() {
            if i > 0 {
                self.line_break()?;
            }
            for (j, word) in seg.split(' ').enumerate() {
                if j > 0 {
                    self.pending_space = true;
                }
                if !word.is_empty() {
                    self.emit_word(word, style)?;
                }
            }
        }
        Ok(())
    }

    fn emit_word(&mut self, word: &str, style: TextStyle) -> io::Result<()> {
        self.write_leaders()?;

        let wlen = word.chars().count();
        let space = usize::from(self.pending_space && self.column > self.line_base());

        if self.column + space + wlen > self.wrap_limit() && self.column > self.line_base() {
            self.line_break()?;
            self.write_leaders()?;
        } else if space == 1 {
            self.write_styled(" ", style)?;
        }

        self.pending_space = false;
        self.write_styled(word, style)
    }

    // ---- block rendering ----

    /// Render one node; dispatch by kind, a dedicated method per kind.
    fn format_node(&mut self, node: &Block<'i>) -> io::Result<()> {
        match node.value {
            NodeValue::Document => self.render_children(node, true),
            NodeValue::Quote => self.render_quote(node),
            NodeValue::List(..) => self.render_list(node),
            NodeValue::Table(..) => self.render_table(node),
            NodeValue::Break(ref nb) => {
                if nb.thematic {
                    self.render_thematic_break()?;
                }
                Ok(())
            }
            NodeValue::CodeBlock(..) => self.render_code_block(node),
            NodeValue::Heading(..) => self.render_heading(node),
            NodeValue::Paragraph => self.render_paragraph(node),
            NodeValue::Alert(..) => self.render_alert(node),
            NodeValue::Item(..) | NodeValue::TableRow(..) | NodeValue::TableCell => {
                unreachable!("rendered by the enclosing container")
            }
        }
    }

    /// Render a container's children, with a leader-only blank line
    /// between each pair when `blank_between`.
    fn render_children(&mut self, node: &Block<'i>, blank_between: bool) -> io::Result<()> {
        let mut first = true;
        for child in &node.children {
            if is_blank_break(child) {
                continue;
            }
            if !first && blank_between {
                self.blank_line()?;
            }
            first = false;
            self.format_node(child)?;
        }
        Ok(())
    }

    fn render_quote(&mut self, node: &Block<'i>) -> io::Result<()> {
        let glyphs = self.options.render.box_style.glyphs();
        let bar = format!("{} ", glyphs.quote_bar);
        self.push_leader(&bar, TextStyle::fg(Color::SlateGrey));
        let result = self.render_children(node, true);
        self.pop_leader();
        result
    }

    fn render_thematic_break(&mut self) -> io::Result<()> {
        let glyphs = self.options.render.box_style.glyphs();
        self.write_leaders()?;
        let fill = self.width().saturating_sub(self.column).max(3);
        self.write_styled(&glyphs.horizontal.repeat(fill), TextStyle::fg(Color::SlateGrey))?;
        self.line_break()
    }

    fn render_list(&mut self, node: &Block<'i>) -> io::Result<()> {
        let nl = match node.value {
            NodeValue::List(nl) => nl,
            _ => unreachable!(),
        };

        let items: Vec<&Block<'i>> = node
            .children
            .iter()
            .filter(|c| !is_blank_break(c))
            .collect();

        // Ordered markers renumber sequentially from the start ordinal,
        // zero-padded to the widest label in the list.
        let number_width = match nl.variant {
            ListVariant::Ordered => decimal_width(nl.start + items.len().saturating_sub(1)),
            _ => 0,
        };

        for (i, item) in items.iter().enumerate() {
            if i > 0 && !nl.tight {
                self.blank_line()?;
            }
            self.write_leaders()?;

            let (marker, style) = match nl.variant {
                ListVariant::Unordered => (format!("{} ", BULLET), TextStyle::fg(Color::Yellow)),
                ListVariant::Task => {
                    let checked = match item.value {
                        NodeValue::Item(ni) => ni.checked,
                        _ => unreachable!(),
                    };
                    if checked {
                        (format!("{} ", TASK_DONE), TextStyle::fg(Color::Green))
                    } else {
                        (format!("{} ", TASK_OPEN), TextStyle::fg(Color::Red))
                    }
                }
                ListVariant::Ordered => (
                    format!("{:0w$}. ", nl.start + i, w = number_width),
                    TextStyle::fg(Color::Yellow),
                ),
            };

            self.write_styled(&marker, style)?;
            self.push_leader(&" ".repeat(marker.chars().count()), TextStyle::default());
            let result = self.render_item(item);
            self.pop_leader();
            result?;
        }
        Ok(())
    }

    /// The marker line is already started; the item's first block
    /// continues it, later blocks get fresh leader-prefixed lines.
    fn render_item(&mut self, item: &Block<'i>) -> io::Result<()> {
        let mut rendered = false;
        for child in &item.children {
            if is_blank_break(child) {
                continue;
            }
            rendered = true;
            self.format_node(child)?;
        }
        if !rendered {
            self.line_break()?;
        }
        Ok(())
    }

    fn render_heading(&mut self, node: &Block<'i>) -> io::Result<()> {
        let nh = match node.value {
            NodeValue::Heading(ref nh) => nh,
            _ => unreachable!(),
        };

        self.write_leaders()?;

        let (over, fill) = match nh.level {
            1 => (
                TextStyle {
                    bold: true,
                    ..TextStyle::default()
                },
                Some("═"),
            ),
            2 => (
                TextStyle {
                    bold: true,
                    ..TextStyle::default()
                },
                Some("─"),
            ),
            3 => (
                TextStyle {
                    italic: true,
                    underline: true,
                    ..TextStyle::default()
                },
                None,
            ),
            _ => (
                TextStyle {
                    underline: true,
                    ..TextStyle::default()
                },
                None,
            ),
        };

        match fill {
            Some(fill) => {
                let text_len = nh.text.chars().count();
                let total = self.width().saturating_sub(self.column + text_len + 2);
                let left = total / 2;
                let right = total - left;
                let rule_style = TextStyle::fg(Color::SlateGrey);

                self.write_styled(&fill.repeat(left), rule_style)?;
                self.write_styled(" ", TextStyle::default())?;
                self.with_override(over, |f| f.render_inlines(&node.inlines))?;
                self.write_styled(" ", TextStyle::default())?;
                self.write_styled(&fill.repeat(right), rule_style)?;
            }
            None => {
                self.with_override(over, |f| f.render_inlines(&node.inlines))?;
            }
        }
        self.line_break()
    }

    fn with_override<F>(&mut self, over: TextStyle, body: F) -> io::Result<()>
    where
        F: FnOnce(&mut Self) -> io::Result<()>,
    {
        let saved = self.style_override;
        self.style_override = Some(match saved {
            Some(outer) => outer.union(&over),
            None => over,
        });
        let result = body(self);
        self.style_override = saved;
        result
    }

    fn render_paragraph(&mut self, node: &Block<'i>) -> io::Result<()> {
        self.write_leaders()?;
        self.render_inlines(&node.inlines)?;
        self.line_break()
    }

    fn render_code_block(&mut self, node: &Block<'i>) -> io::Result<()> {
        let ncb = match node.value {
            NodeValue::CodeBlock(ref ncb) => ncb,
            _ => unreachable!(),
        };

        match ncb.directive {
            Some(Directive::Admonition(severity)) => {
                let literal = ncb.literal.trim_end_matches('\n').to_string();
                self.render_box(severity, |f| {
                    f.wrap_text(&literal, TextStyle::default())?;
                    f.line_break()
                })
            }
            Some(Directive::TableOfContents) => {
                let list = toc::to_list_block(&toc::build(self.document));
                self.format_node(&list)
            }
            None => self.render_fenced_code(node, ncb),
        }
    }

    fn render_fenced_code(
        &mut self,
        _node: &Block<'i>,
        ncb: &crate::nodes::NodeCodeBlock,
    ) -> io::Result<()> {
        let glyphs = self.options.render.box_style.glyphs();
        let border = TextStyle::fg(Color::SlateGrey);
        let h = glyphs.horizontal;

        self.write_leaders()?;
        self.write_styled(&format!("{}{}{}", glyphs.round_top_left, h, h), border)?;
        if !ncb.info.is_empty() {
            self.write_styled(" ", TextStyle::default())?;
            self.write_styled(&ncb.info, TextStyle::fg(Color::Cyan))?;
        }
        self.line_break()?;

        self.push_leader(&format!("{} ", glyphs.vertical), border);
        self.render_code_body(ncb)?;
        self.pop_leader();

        self.write_leaders()?;
        self.write_styled(
            &format!("{}{}{}{}", glyphs.round_bottom_left, h, h, h),
            border,
        )?;
        self.line_break()
    }

    fn render_code_body(&mut self, ncb: &crate::nodes::NodeCodeBlock) -> io::Result<()> {
        let lang = ncb.info.split_whitespace().next().unwrap_or("");
        let spans = if lang.is_empty() {
            None
        } else {
            self.plugins
                .render
                .codefence_syntax_highlighter
                .and_then(|hl| hl.highlight(lang, &ncb.literal))
        };

        match spans {
            Some(spans) => self.render_highlight_spans(&spans),
            None => {
                for line in ncb.literal.lines() {
                    self.write_leaders()?;
                    self.write_styled(line, TextStyle::default())?;
                    self.line_break()?;
                }
                Ok(())
            }
        }
    }

    fn render_highlight_spans(&mut self, spans: &[HighlightSpan]) -> io::Result<()> {
        for span in spans {
            self.write_leaders()?;
            self.write_styled(&span.text, TextStyle::fg(span.color))?;
            if span.newline {
                self.line_break()?;
            }
        }
        // A trailing segment without a newline still ends the last line.
        if spans.last().is_some_and(|s| !s.newline) {
            self.line_break()?;
        }
        Ok(())
    }

    fn render_alert(&mut self, node: &Block<'i>) -> io::Result<()> {
        let severity = match node.value {
            NodeValue::Alert(ref na) => na.severity,
            _ => unreachable!(),
        };
        let inlines = node.inlines.clone();
        self.render_box(severity, move |f| {
            f.with_override(TextStyle::fg(severity.color()), |f| {
                f.render_inlines(&inlines)
            })?;
            f.line_break()
        })
    }

    /// A severity-colored box: titled top rule, `│ ` leader, ` │` right
    /// trailer, bottom rule.
    fn render_box<F>(&mut self, severity: AlertType, body: F) -> io::Result<()>
    where
        F: FnOnce(&mut Self) -> io::Result<()>,
    {
        let glyphs = self.options.render.box_style.glyphs();
        let border = TextStyle::fg(severity.color());
        let h = glyphs.horizontal;
        let title = severity.default_title();

        self.write_leaders()?;
        let head = format!("{}{} {} ", glyphs.round_top_left, h, title);
        let fill = self.width().saturating_sub(self.column + head.chars().count() + 1);
        self.write_styled(&head, border)?;
        self.write_styled(&h.repeat(fill), border)?;
        self.write_styled(glyphs.top_right, border)?;
        self.line_break()?;

        self.push_leader(&format!("{} ", glyphs.vertical), border);
        let saved_trailer = self.trailer.replace(Leader {
            text: format!(" {}", glyphs.vertical),
            style: border,
        });
        let result = body(self);
        self.trailer = saved_trailer;
        self.pop_leader();
        result?;

        self.write_leaders()?;
        let fill = self.width().saturating_sub(self.column + 2);
        self.write_styled(glyphs.round_bottom_left, border)?;
        self.write_styled(&h.repeat(fill), border)?;
        self.write_styled(glyphs.bottom_right, border)?;
        self.line_break()
    }

    fn render_table(&mut self, node: &Block<'i>) -> io::Result<()> {
        let (ncol, alignments) = match node.value {
            NodeValue::Table(ref nt) => (nt.ncol, nt.alignments.clone()),
            _ => unreachable!(),
        };
        if ncol == 0 {
            return Ok(());
        }

        let glyphs = self.options.render.box_style.glyphs();
        let border = TextStyle::fg(Color::SlateGrey);
        // Leaders and the left margin shift the table right; the right
        // margin mirrors the left one.
        let avail = self
            .width()
            .saturating_sub(self.line_base() + self.options.render.indent);
        let col_w = (avail.saturating_sub(ncol + 1) / ncol).max(3);

        // Each cell renders into its own off-screen buffer at the column
        // width, then the rows de-interleave line by line.
        let mut sub_options = self.options.clone();
        sub_options.render.width = col_w;
        sub_options.render.indent = 1;
        sub_options.render.buffered = true;

        let rows: Vec<(bool, Vec<Vec<String>>)> = node
            .children
            .iter()
            .map(|row| {
                let header = matches!(row.value, NodeValue::TableRow(true));
                let cells = row
                    .children
                    .iter()
                    .map(|cell| self.render_cell(cell, &sub_options, header))
                    .collect();
                (header, cells)
            })
            .collect();

        let hbar = |n: usize| glyphs.horizontal.repeat(n);

        // Top border.
        self.write_leaders()?;
        let mut top = String::from(glyphs.top_left);
        for i in 0..ncol {
            top.push_str(&hbar(col_w));
            top.push_str(if i + 1 < ncol {
                glyphs.tee_down
            } else {
                glyphs.top_right
            });
        }
        self.write_styled(&top, border)?;
        self.line_break()?;

        for (r, (header, cells)) in rows.iter().enumerate() {
            let height = cells.iter().map(|c| c.len()).max().unwrap_or(1).max(1);
            for line in 0..height {
                self.write_leaders()?;
                self.write_styled(glyphs.vertical, border)?;
                for c in 0..ncol {
                    let text = cells
                        .get(c)
                        .and_then(|cell| cell.get(line))
                        .map(String::as_str)
                        .unwrap_or("");
                    let align = alignments.get(c).copied().unwrap_or_default();
                    self.write_cell_line(text, col_w, align)?;
                    self.write_styled(glyphs.vertical, border)?;
                }
                self.line_break()?;
            }

            // Rule under the header row.
            if *header && r + 1 < rows.len() {
                self.write_leaders()?;
                let mut sep = String::from(glyphs.tee_right);
                for i in 0..ncol {
                    sep.push_str(&hbar(col_w));
                    sep.push_str(if i + 1 < ncol {
                        glyphs.cross
                    } else {
                        glyphs.tee_left
                    });
                }
                self.write_styled(&sep, border)?;
                self.line_break()?;
            }
        }

        // Bottom border.
        self.write_leaders()?;
        let mut bottom = String::from(glyphs.bottom_left);
        for i in 0..ncol {
            bottom.push_str(&hbar(col_w));
            bottom.push_str(if i + 1 < ncol {
                glyphs.tee_up
            } else {
                glyphs.bottom_right
            });
        }
        self.write_styled(&bottom, border)?;
        self.line_break()
    }

    /// Render one cell into a buffered sub-formatter and split its lines.
    fn render_cell(&self, cell: &Block<'i>, options: &Options, header: bool) -> Vec<String> {
        let mut buf: Vec<u8> = Vec::new();
        {
            let mut sub = ConsoleFormatter::new(&mut buf, options, self.plugins, self.document);
            if header {
                sub.style_override = Some(TextStyle {
                    bold: true,
                    ..TextStyle::default()
                });
            }
            sub.write_leaders()
                .and_then(|_| sub.render_inlines(&cell.inlines))
                .and_then(|_| sub.reset_style())
                .expect("writes to a Vec cannot fail");
        }
        String::from_utf8_lossy(&buf)
            .split('\n')
            .map(str::to_string)
            .collect()
    }

    /// One line of one cell, padded to the column width by visible
    /// (escape-blind) length, honoring the column alignment.
    fn write_cell_line(&mut self, text: &str, col_w: usize, align: TableAlignment) -> io::Result<()> {
        let visible = visible_width(text);
        let pad = col_w.saturating_sub(visible);
        let (left, right) = match align {
            TableAlignment::Right => (pad, 0),
            TableAlignment::Center => (pad / 2, pad - pad / 2),
            _ => (0, pad),
        };
        self.reset_style()?;
        self.write_raw(&" ".repeat(left))?;
        self.write_raw(text)?;
        self.reset_style()?;
        self.write_raw(&" ".repeat(right))?;
        self.column += col_w;
        Ok(())
    }

    // ---- inline rendering ----

    fn render_inlines(&mut self, inlines: &[Inline]) -> io::Result<()> {
        for inline in inlines {
            match *inline {
                Inline::Text(ref t) => self.wrap_text(&t.text, t.style)?,
                Inline::Codespan(ref body) => {
                    let style = TextStyle {
                        fg: Color::Purple,
                        bg: Color::DarkGrey,
                        ..TextStyle::default()
                    };
                    self.wrap_text(body, style)?;
                }
                Inline::Autolink(ref url) => self.render_hyperlink(url, None)?,
                Inline::Link(ref nl) => self.render_hyperlink(&nl.url, Some(&nl.text))?,
                Inline::Image(ref ni) => self.render_image(ni)?,
                Inline::LineBreak => {
                    self.line_break()?;
                    self.write_leaders()?;
                }
            }
        }
        Ok(())
    }

    /// An OSC 8 hyperlink: `ESC ] 8 ; ; URL ESC \ text ESC ] 8 ; ; ESC \`.
    /// The escape frames carry no printable width.
    fn render_hyperlink(&mut self, url: &str, text: Option<&[InlineText]>) -> io::Result<()> {
        let target = strings::sanitize_hyperlink(url);
        self.write_leaders()?;
        self.write_raw(&format!("\x1b]8;;{}\x1b\\", target))?;

        let link_style = TextStyle::fg(Color::Cyan);
        match text {
            Some(runs) if !runs.is_empty() => {
                for run in runs {
                    self.wrap_text(&run.text, run.style.union(&link_style))?;
                }
            }
            _ => {
                let visible = url.strip_prefix("mailto:").unwrap_or(url);
                self.wrap_text(visible, link_style)?;
            }
        }

        self.write_raw("\x1b]8;;\x1b\\")
    }

    /// `alt → src` in colored text, then the image itself when a decoder
    /// is available and the terminal reported a pixel size. Failures at
    /// any step skip the image silently.
    fn render_image(&mut self, ni: &crate::nodes::NodeImage) -> io::Result<()> {
        let label_style = TextStyle::fg(Color::Pink);
        for run in &ni.alt {
            self.wrap_text(&run.text, run.style.union(&label_style))?;
        }
        self.wrap_text(" → ", TextStyle::fg(Color::SlateGrey))?;
        self.wrap_text(&ni.src, TextStyle::fg(Color::Cyan))?;

        if let Some((data, cols, rows, bytes)) = self.prepare_image(ni) {
            self.line_break()?;
            self.write_leaders()?;
            let pad = self.width().saturating_sub(self.column + cols) / 2;
            self.reset_style()?;
            self.write_raw(&" ".repeat(pad))?;
            match data {
                PreparedImage::Png => {
                    graphics::emit(self.output, &graphics::ImageData::Png(&bytes), cols, rows)?
                }
                PreparedImage::Rgb { width, height } => graphics::emit(
                    self.output,
                    &graphics::ImageData::Rgb {
                        width,
                        height,
                        pixels: &bytes,
                    },
                    cols,
                    rows,
                )?,
            }
            self.line_break()?;
        }
        Ok(())
    }

    /// Everything that can go wrong short of an output error ends the
    /// attempt quietly.
    fn prepare_image(
        &mut self,
        ni: &crate::nodes::NodeImage,
    ) -> Option<(PreparedImage, usize, usize, Vec<u8>)> {
        if self.options.render.buffered {
            return None;
        }
        if self.options.render.terminal_pixel_size == (0, 0) {
            return None;
        }
        if ni.src.contains("://") {
            return None;
        }

        let decoder = self.plugins.render.image_decoder?;
        let bytes = match std::fs::read(&ni.src) {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!("image read failed for {}: {}", ni.src, err);
                return None;
            }
        };
        let decoded = match decoder.decode(&bytes) {
            Ok(decoded) => decoded,
            Err(err) => {
                debug!("image decode failed for {}: {}", ni.src, err);
                return None;
            }
        };

        let max_cols = self
            .options
            .render
            .max_image_cols
            .min(self.width().saturating_sub(self.line_base()));
        let (cols, rows) = graphics::fit(
            decoded.width,
            decoded.height,
            max_cols,
            self.options.render.terminal_size,
            self.options.render.terminal_pixel_size,
        )?;

        if is_png(&bytes) {
            Some((PreparedImage::Png, cols, rows, bytes))
        } else if decoded.channels == 3 {
            Some((
                PreparedImage::Rgb {
                    width: decoded.width,
                    height: decoded.height,
                },
                cols,
                rows,
                decoded.pixels,
            ))
        } else {
            debug!("image {} has {} channels, skipping", ni.src, decoded.channels);
            None
        }
    }
}

enum PreparedImage {
    Png,
    Rgb { width: u32, height: u32 },
}

fn is_blank_break(block: &Block) -> bool {
    matches!(block.value, NodeValue::Break(nb) if !nb.thematic)
}

fn decimal_width(mut n: usize) -> usize {
    let mut w = 1;
    while n >= 10 {
        n /= 10;
        w += 1;
    }
    w
}

/// The code-point width of `s` with escape sequences (CSI, OSC, APC)
/// skipped.
pub(crate) fn visible_width(s: &str) -> usize {
    let mut width = 0;
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            width += 1;
            continue;
        }
        match chars.next() {
            // CSI: parameters then a final byte in @..~.
            Some('[') => {
                for c in chars.by_ref() {
                    if ('\u{40}'..='\u{7e}').contains(&c) {
                        break;
                    }
                }
            }
            // OSC and APC: terminated by ESC \.
            Some(']') | Some('_') => {
                let mut prev = ' ';
                for c in chars.by_ref() {
                    if prev == '\x1b' && c == '\\' {
                        break;
                    }
                    prev = c;
                }
            }
            // A two-byte escape (including the ESC \ terminator itself).
            Some(_) => {}
            None => {}
        }
    }
    width
}
