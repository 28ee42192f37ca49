//! Adapter for the Syntect syntax highlighter plugin.

use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::adapters::{HighlightSpan, SyntaxHighlighterAdapter};
use crate::nodes::Color;

/// Syntect syntax highlighter plugin. Maps theme styles onto the fixed
/// palette, nearest-color.
pub struct SyntectAdapter {
    theme: String,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl SyntectAdapter {
    /// Construct a new `SyntectAdapter` with the given theme name (one of
    /// syntect's bundled defaults, e.g. `"base16-ocean.dark"`).
    pub fn new(theme: &str) -> Self {
        SyntectAdapter {
            theme: theme.to_string(),
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }
}

impl SyntaxHighlighterAdapter for SyntectAdapter {
    fn highlight(&self, lang: &str, source: &str) -> Option<Vec<HighlightSpan>> {
        if lang.is_empty() {
            return None;
        }
        let syntax = self.syntax_set.find_syntax_by_token(lang)?;
        let theme = self.theme_set.themes.get(&self.theme)?;

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut spans = Vec::new();

        for line in LinesWithEndings::from(source) {
            let regions = match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(regions) => regions,
                Err(_) => return None,
            };
            let last = regions.len().saturating_sub(1);
            for (i, (style, text)) in regions.into_iter().enumerate() {
                let trimmed = text.trim_end_matches('\n');
                let newline = i == last && text.ends_with('\n');
                if trimmed.is_empty() && !newline {
                    continue;
                }
                spans.push(HighlightSpan {
                    color: nearest_palette(style.foreground),
                    text: trimmed.to_string(),
                    newline,
                });
            }
        }

        Some(spans)
    }
}

/// The palette entry closest to an RGB theme color, by squared distance.
/// Basic terminal entries compare through nominal RGB values.
fn nearest_palette(c: syntect::highlighting::Color) -> Color {
    const CANDIDATES: [(Color, (u8, u8, u8)); 15] = [
        (Color::Black, (0, 0, 0)),
        (Color::Red, (204, 36, 29)),
        (Color::Green, (152, 151, 26)),
        (Color::Yellow, (215, 153, 33)),
        (Color::Blue, (69, 133, 136)),
        (Color::Magenta, (177, 98, 134)),
        (Color::Cyan, (104, 157, 106)),
        (Color::White, (255, 255, 255)),
        (Color::Orange, (255, 165, 0)),
        (Color::Purple, (155, 89, 182)),
        (Color::Pink, (255, 105, 180)),
        (Color::Teal, (0, 128, 128)),
        (Color::Coral, (255, 127, 80)),
        (Color::SlateGrey, (112, 128, 144)),
        (Color::LightGrey, (211, 211, 211)),
    ];

    let dist = |(r, g, b): (u8, u8, u8)| -> i64 {
        let dr = r as i64 - c.r as i64;
        let dg = g as i64 - c.g as i64;
        let db = b as i64 - c.b as i64;
        dr * dr + dg * dg + db * db
    };

    CANDIDATES
        .iter()
        .min_by_key(|(_, rgb)| dist(*rgb))
        .map(|&(color, _)| color)
        .unwrap_or(Color::Default)
}
