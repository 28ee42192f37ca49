//! Adapter traits for plugins.
//!
//! Each plugin has to implement one of the traits available in this module.

use crate::nodes::Color;

/// One colored segment of a highlighted code body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSpan {
    /// The palette entry to paint `text` with.
    pub color: Color,

    /// The segment text. Never contains a line ending; `newline` records
    /// one instead.
    pub text: String,

    /// Whether a line ending follows this segment.
    pub newline: bool,
}

/// Implement this adapter for custom syntax highlighting of fenced code
/// blocks in the console and range renderers.
pub trait SyntaxHighlighterAdapter {
    /// Segment `source` into colored spans for the given language (the
    /// info string of the fence after the opening back-ticks).
    ///
    /// Returning `None` means the language is unavailable; the renderer
    /// falls back to the default code style.
    fn highlight(&self, lang: &str, source: &str) -> Option<Vec<HighlightSpan>>;
}

/// A decoded raster image.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,

    /// Height in pixels.
    pub height: u32,

    /// Channels per pixel; 3 (RGB) is the only value renderers consume.
    pub channels: u8,

    /// Row-major, tightly packed pixel bytes.
    pub pixels: Vec<u8>,
}

/// The 8-byte PNG signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Whether `bytes` begin with the PNG signature.
pub fn is_png(bytes: &[u8]) -> bool {
    bytes.len() >= 8 && bytes[..8] == PNG_SIGNATURE
}

/// Implement this adapter to decode image bytes for in-band terminal
/// graphics. A decode failure makes the console renderer skip the image
/// silently.
pub trait ImageDecoderAdapter {
    /// Decode `bytes` into an RGB raster. Implementations report any
    /// unsupported layout (channel counts other than 3) as an error
    /// string; the message is only ever logged.
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, String>;
}

/// The fixed mapping from highlight capture names to palette entries.
/// Capture names follow the usual query vocabulary (`keyword.return`,
/// `string.escape`, `comment.todo`, `markup.heading.1`...); matching is by
/// the leading dotted segment.
pub fn capture_color(capture: &str) -> Color {
    let head = capture.split('.').next().unwrap_or(capture);
    match head {
        "keyword" | "conditional" | "repeat" | "include" => Color::Purple,
        "string" | "character" => Color::Green,
        "comment" => Color::SlateGrey,
        "number" | "constant" | "boolean" => Color::Orange,
        "function" | "method" => Color::Blue,
        "type" | "structure" | "class" => Color::Yellow,
        "operator" | "punctuation" | "delimiter" => Color::LightGrey,
        "label" | "tag" | "attribute" => Color::Teal,
        "markup" => match capture {
            "markup.heading.1" | "markup.heading.2" => Color::Coral,
            "markup.heading.3" | "markup.heading.4" => Color::Pink,
            "markup.heading.5" | "markup.heading.6" => Color::Magenta,
            _ => Color::Cyan,
        },
        _ => Color::Default,
    }
}
