//! Configuration for the parser and renderers.

use std::fmt::{self, Debug, Formatter};

use crate::adapters::{ImageDecoderAdapter, SyntaxHighlighterAdapter};

/// Umbrella options struct.
#[derive(Default, Debug, Clone)]
pub struct Options {
    /// Configure parse-time options.
    pub parse: ParseOptions,

    /// Configure render-time options.
    pub render: RenderOptions,
}

/// Options for parsing. The dialect is fixed (GitHub-leaning CommonMark
/// subset); this struct carries the remaining parse-time knobs.
#[derive(Default, Debug, Clone)]
pub struct ParseOptions {
    /// The default info string for fenced code blocks that have none.
    ///
    /// ```rust
    /// # use inkdown::{markdown_to_html, Options};
    /// let mut options = Options::default();
    /// options.render.body_only = true;
    /// options.parse.default_info_string = Some("rust".to_string());
    /// assert_eq!(
    ///     markdown_to_html("```\nfn hello();\n```\n", &options),
    ///     "<pre><code class=\"language-rust\">fn hello();\n</code></pre>\n"
    /// );
    /// ```
    pub default_info_string: Option<String>,
}

/// Options for rendering, shared by all renderers; each consumes the
/// fields that make sense for its output.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Target output width in columns, counted in code points.
    ///
    /// ```rust
    /// # use inkdown::{markdown_to_console, Options};
    /// let mut options = Options::default();
    /// options.render.width = 40;
    /// let out = markdown_to_console("hello\n", &options);
    /// assert!(out.contains("hello"));
    /// ```
    pub width: usize,

    /// Left margin, in columns, written after every line break.
    pub indent: usize,

    /// Upper bound on the width of an inline image, in columns.
    pub max_image_cols: usize,

    /// The terminal size in `(columns, rows)`, used to scale images.
    pub terminal_size: (u16, u16),

    /// The terminal size in pixels, used to derive the pixel-per-cell
    /// ratio for image scaling. `(0, 0)` disables image emission.
    pub terminal_pixel_size: (u16, u16),

    /// Set when rendering into an off-screen buffer (table cells, paging):
    /// suppresses in-band line clears.
    pub buffered: bool,

    /// HTML renderer: omit the `<html><head>` wrapper and embedded CSS.
    pub body_only: bool,

    /// The box-drawing glyph set used for borders.
    pub box_style: BoxStyle,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            width: 80,
            indent: 0,
            max_image_cols: 80,
            terminal_size: (80, 24),
            terminal_pixel_size: (0, 0),
            buffered: false,
            body_only: false,
            box_style: BoxStyle::default(),
        }
    }
}

/// A box-drawing glyph set. Borders across the console renderer (tables,
/// code blocks, alert boxes) draw from one of these so nested boxes look
/// consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoxStyle {
    /// Light single-line box drawing.
    #[default]
    Light,

    /// Heavy single-line box drawing.
    Heavy,

    /// Plain ASCII.
    Ascii,
}

impl BoxStyle {
    pub(crate) fn glyphs(&self) -> &'static BoxGlyphs {
        match *self {
            BoxStyle::Light => &BoxGlyphs {
                top_left: "┌",
                top_right: "┐",
                bottom_left: "└",
                bottom_right: "┘",
                horizontal: "─",
                vertical: "│",
                cross: "┼",
                tee_down: "┬",
                tee_up: "┴",
                tee_right: "├",
                tee_left: "┤",
                quote_bar: "┃",
                round_top_left: "╭",
                round_bottom_left: "╰",
            },
            BoxStyle::Heavy => &BoxGlyphs {
                top_left: "┏",
                top_right: "┓",
                bottom_left: "┗",
                bottom_right: "┛",
                horizontal: "━",
                vertical: "┃",
                cross: "╋",
                tee_down: "┳",
                tee_up: "┻",
                tee_right: "┣",
                tee_left: "┫",
                quote_bar: "┃",
                round_top_left: "┏",
                round_bottom_left: "┗",
            },
            BoxStyle::Ascii => &BoxGlyphs {
                top_left: "+",
                top_right: "+",
                bottom_left: "+",
                bottom_right: "+",
                horizontal: "-",
                vertical: "|",
                cross: "+",
                tee_down: "+",
                tee_up: "+",
                tee_right: "+",
                tee_left: "+",
                quote_bar: "|",
                round_top_left: "+",
                round_bottom_left: "+",
            },
        }
    }
}

/// One glyph set; see [`BoxStyle`].
pub(crate) struct BoxGlyphs {
    pub top_left: &'static str,
    pub top_right: &'static str,
    pub bottom_left: &'static str,
    pub bottom_right: &'static str,
    pub horizontal: &'static str,
    pub vertical: &'static str,
    pub cross: &'static str,
    pub tee_down: &'static str,
    pub tee_up: &'static str,
    pub tee_right: &'static str,
    pub tee_left: &'static str,
    pub quote_bar: &'static str,
    pub round_top_left: &'static str,
    pub round_bottom_left: &'static str,
}

/// Umbrella plugins struct.
#[derive(Default, Clone)]
pub struct Plugins<'p> {
    /// Configure render-time plugins.
    pub render: RenderPlugins<'p>,
}

impl Debug for Plugins<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugins").field("render", &self.render).finish()
    }
}

/// Plugins for rendering.
#[derive(Default, Clone)]
pub struct RenderPlugins<'p> {
    /// Highlights fenced code bodies by info-string language.
    pub codefence_syntax_highlighter: Option<&'p dyn SyntaxHighlighterAdapter>,

    /// Decodes image bytes for in-band terminal graphics.
    pub image_decoder: Option<&'p dyn ImageDecoderAdapter>,
}

impl Debug for RenderPlugins<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderPlugins")
            .field(
                "codefence_syntax_highlighter",
                &self.codefence_syntax_highlighter.map(|_| ".."),
            )
            .field("image_decoder", &self.image_decoder.map(|_| ".."))
            .finish()
    }
}
