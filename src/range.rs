//! The range renderer: no text output, just `(line, start_col, end_col,
//! style)` spans for consumers that paint their own buffer.
//!
//! It runs the console traversal into an off-screen buffer (line clears
//! suppressed) and folds the escape stream back into spans. That keeps
//! the range output column-for-column consistent with the console
//! renderer by construction; columns count code points throughout.

use std::str::Chars;

use crate::console;
use crate::nodes::{Block, Color, TextStyle};
use crate::parser::options::{Options, Plugins};

/// One styled span of rendered output. Columns are zero-based code-point
/// offsets; `end_col` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRange {
    pub line: usize,
    pub start_col: usize,
    pub end_col: usize,
    pub style: TextStyle,
}

/// Render `root` and collect the styled spans of its console output.
/// Spans with the default style are not reported.
pub fn render_document(root: &Block, options: &Options) -> Vec<StyleRange> {
    render_document_with_plugins(root, options, &Plugins::default())
}

/// As [`render_document`], with plugins (highlighting changes the spans).
pub fn render_document_with_plugins(
    root: &Block,
    options: &Options,
    plugins: &Plugins,
) -> Vec<StyleRange> {
    let mut buffered = options.clone();
    buffered.render.buffered = true;

    let mut buf: Vec<u8> = Vec::new();
    console::format_document_with_plugins(root, &buffered, &mut buf, plugins)
        .expect("writes to a Vec cannot fail");

    collect(&String::from_utf8_lossy(&buf))
}

/// Fold a rendered escape stream into spans.
fn collect(rendered: &str) -> Vec<StyleRange> {
    let mut out = Vec::new();
    let mut state = Collector::default();

    let mut chars = rendered.chars();
    while let Some(c) = chars.next() {
        match c {
            '\x1b' => consume_escape(&mut chars, &mut state, &mut out),
            '\n' => {
                state.end_span(&mut out);
                state.line += 1;
                state.col = 0;
            }
            _ => {
                if state.span_start.is_none() && !state.style.is_plain() {
                    state.span_start = Some(state.col);
                }
                state.col += 1;
            }
        }
    }
    state.end_span(&mut out);
    out
}

#[derive(Default)]
struct Collector {
    line: usize,
    col: usize,
    style: TextStyle,
    span_start: Option<usize>,
}

impl Collector {
    fn end_span(&mut self, out: &mut Vec<StyleRange>) {
        if let Some(start) = self.span_start.take() {
            if self.col > start {
                out.push(StyleRange {
                    line: self.line,
                    start_col: start,
                    end_col: self.col,
                    style: self.style,
                });
            }
        }
    }

    fn set_style(&mut self, style: TextStyle, out: &mut Vec<StyleRange>) {
        if style == self.style {
            return;
        }
        self.end_span(out);
        self.style = style;
        if !style.is_plain() {
            self.span_start = Some(self.col);
        }
    }
}

/// Consume one escape sequence; only SGR changes the collector state.
fn consume_escape(chars: &mut Chars, state: &mut Collector, out: &mut Vec<StyleRange>) {
    match chars.next() {
        Some('[') => {
            let mut params = String::new();
            for c in chars.by_ref() {
                if ('\u{40}'..='\u{7e}').contains(&c) {
                    if c == 'm' {
                        let style = apply_sgr(state.style, &params);
                        state.set_style(style, out);
                    }
                    break;
                }
                params.push(c);
            }
        }
        // OSC and APC payloads (hyperlinks, graphics) have no columns.
        Some(']') | Some('_') => {
            let mut prev = ' ';
            for c in chars.by_ref() {
                if prev == '\x1b' && c == '\\' {
                    break;
                }
                prev = c;
            }
        }
        _ => {}
    }
}

/// Apply an SGR parameter list to a style.
fn apply_sgr(mut style: TextStyle, params: &str) -> TextStyle {
    if params.is_empty() {
        return TextStyle::default();
    }

    let parts: Vec<u16> = params
        .split(';')
        .map(|p| p.parse().unwrap_or(0))
        .collect();

    let mut i = 0;
    while i < parts.len() {
        match parts[i] {
            0 => style = TextStyle::default(),
            1 => style.bold = true,
            22 => style.bold = false,
            3 => style.italic = true,
            23 => style.italic = false,
            4 => style.underline = true,
            24 => style.underline = false,
            5 => style.blink = true,
            25 => style.blink = false,
            7 => style.reverse = true,
            27 => style.reverse = false,
            8 => style.hide = true,
            28 => style.hide = false,
            9 => style.strike = true,
            29 => style.strike = false,
            30..=37 => style.fg = basic_color(parts[i] - 30),
            39 => style.fg = Color::Default,
            40..=47 => style.bg = basic_color(parts[i] - 40),
            49 => style.bg = Color::Default,
            38 | 48 => {
                // 38;2;r;g;b — extended entries round-trip through their
                // RGB values.
                if parts.get(i + 1) == Some(&2) && i + 4 < parts.len() {
                    let rgb = (
                        parts[i + 2] as u8,
                        parts[i + 3] as u8,
                        parts[i + 4] as u8,
                    );
                    let color = extended_color(rgb);
                    if parts[i] == 38 {
                        style.fg = color;
                    } else {
                        style.bg = color;
                    }
                    i += 4;
                }
            }
            _ => {}
        }
        i += 1;
    }
    style
}

fn basic_color(n: u16) -> Color {
    match n {
        0 => Color::Black,
        1 => Color::Red,
        2 => Color::Green,
        3 => Color::Yellow,
        4 => Color::Blue,
        5 => Color::Magenta,
        6 => Color::Cyan,
        7 => Color::White,
        _ => Color::Default,
    }
}

fn extended_color(rgb: (u8, u8, u8)) -> Color {
    const EXTENDED: [Color; 8] = [
        Color::Orange,
        Color::Purple,
        Color::Pink,
        Color::Teal,
        Color::Coral,
        Color::SlateGrey,
        Color::LightGrey,
        Color::DarkGrey,
    ];
    EXTENDED
        .iter()
        .copied()
        .find(|c| c.rgb() == Some(rgb))
        .unwrap_or(Color::Default)
}
