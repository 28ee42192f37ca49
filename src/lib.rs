//! A terminal-first Markdown toolchain in Rust.
//!
//! The pipeline is strictly staged: a lexer turns bytes into tokens, a
//! two-phase block + inline parser builds a tree, and a family of
//! renderers consume it — ANSI console output with width-aware reflow,
//! HTML, canonical Markdown re-emission, and style ranges for embedders.
//!
//! ```
//! use inkdown::{markdown_to_html, Options};
//!
//! let mut options = Options::default();
//! options.render.body_only = true;
//! assert_eq!(
//!     markdown_to_html("Hello, **世界**!\n", &options),
//!     "<p>Hello, <strong>世界</strong>!</p>\n"
//! );
//! ```
//!
//! Parse once and render many ways:
//!
//! ```
//! use inkdown::{parse_document, console, html, Options};
//!
//! let options = Options::default();
//! let doc = parse_document("# Title\n\nBody text.\n", &options);
//!
//! let mut html_out = Vec::new();
//! html::format_document(&doc, &options, &mut html_out).unwrap();
//!
//! let mut console_out = Vec::new();
//! console::format_document(&doc, &options, &mut console_out).unwrap();
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod adapters;
pub mod console;
pub mod format;
pub mod html;
pub mod lexer;
pub mod nodes;
pub mod parser;
pub mod plugins;
pub mod range;
mod scanners;
mod strings;
pub mod toc;

#[cfg(test)]
mod tests;

pub use html::Anchorizer;
pub use parser::options::{BoxStyle, Options, ParseOptions, Plugins, RenderOptions};
pub use parser::parse_document;
pub use range::StyleRange;

use nodes::Block;

/// Render Markdown to HTML.
///
/// See the [`Options`] struct for render configuration.
pub fn markdown_to_html(md: &str, options: &Options) -> String {
    let doc = parse_document(md, options);
    let mut out = Vec::new();
    html::format_document(&doc, options, &mut out).expect("writes to a Vec cannot fail");
    String::from_utf8(out).expect("html output is UTF-8")
}

/// Render Markdown to ANSI-styled console output.
pub fn markdown_to_console(md: &str, options: &Options) -> String {
    let doc = parse_document(md, options);
    let mut out = Vec::new();
    console::format_document(&doc, options, &mut out).expect("writes to a Vec cannot fail");
    String::from_utf8(out).expect("console output is UTF-8")
}

/// Re-emit Markdown in canonical form.
pub fn markdown_to_commonmark(md: &str, options: &Options) -> String {
    let doc = parse_document(md, options);
    let mut out = Vec::new();
    format::format_document(&doc, options, &mut out).expect("writes to a Vec cannot fail");
    String::from_utf8(out).expect("format output is UTF-8")
}

/// Render Markdown to the style ranges its console output would paint.
pub fn markdown_to_ranges(md: &str, options: &Options) -> Vec<StyleRange> {
    let doc = parse_document(md, options);
    range::render_document(&doc, options)
}

/// Parse, then hand the tree to a caller-chosen renderer. Exists so
/// callers holding plugins do not re-parse per backend.
pub fn parse_and_render<F>(md: &str, options: &Options, render: F) -> std::io::Result<Vec<u8>>
where
    F: FnOnce(&Block, &Options, &mut Vec<u8>) -> std::io::Result<()>,
{
    let doc = parse_document(md, options);
    let mut out = Vec::new();
    render(&doc, options, &mut out)?;
    Ok(out)
}
