//! HTML rendering infrastructure for the block tree, as well as helper
//! functions.

mod anchorizer;
mod context;

use std::io::{self, Write};

use crate::nodes::{
    Block, Color, Directive, Inline, InlineText, ListVariant, NodeValue, TableAlignment, TextStyle,
};
use crate::parser::options::Options;
use crate::toc;

#[doc(hidden)]
pub use anchorizer::Anchorizer;
pub use context::Context;

/// The stylesheet embedded in full-page output.
const CSS: &str = "\
body { max-width: 48rem; margin: 2rem auto; padding: 0 1rem;
       font-family: sans-serif; line-height: 1.55; }
pre { background: #f5f5f5; padding: 0.75rem; overflow-x: auto; }
code { font-family: monospace; }
blockquote { border-left: 3px solid #bbb; margin-left: 0; padding-left: 1rem; }
table, th, td { border: 1px solid #999; border-collapse: collapse; }
th, td { padding: 0.25rem 0.5rem; }
.alert { border-left: 4px solid; padding: 0.5rem 1rem; margin: 1rem 0; }
.alert-title { font-weight: bold; }
.alert-note { border-color: #458588; }
.alert-info { border-color: #008080; }
.alert-tip { border-color: #98971a; }
.alert-important { border-color: #9b59b6; }
.alert-warning { border-color: #ffa500; }
.alert-caution { border-color: #cc241d; }
";

/// Formats a block tree as HTML, modified by the given options.
pub fn format_document(root: &Block, options: &Options, output: &mut dyn Write) -> io::Result<()> {
    let mut context = Context::new(output, options, root);

    if !options.render.body_only {
        context.write_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\" />\n")?;
        context.write_str("<style>\n")?;
        context.write_str(CSS)?;
        context.write_str("</style>\n</head>\n<body>\n")?;
    }

    format_node(&mut context, root)?;

    if !options.render.body_only {
        context.cr()?;
        context.write_str("</body>\n</html>\n")?;
    }

    Ok(())
}

fn format_children<'i>(context: &mut Context<'_, '_>, node: &Block<'i>) -> io::Result<()> {
    for child in &node.children {
        format_node(context, child)?;
    }
    Ok(())
}

/// Render one node and its subtree. Every kind has a dedicated method.
fn format_node<'i>(context: &mut Context<'_, '_>, node: &Block<'i>) -> io::Result<()> {
    match node.value {
        NodeValue::Document => format_children(context, node),
        NodeValue::Quote => render_quote(context, node),
        NodeValue::List(..) => render_list(context, node),
        NodeValue::Table(..) => render_table(context, node),
        NodeValue::Item(..) | NodeValue::TableRow(..) | NodeValue::TableCell => {
            unreachable!("rendered by the enclosing container")
        }
        NodeValue::Break(ref nb) => {
            if nb.thematic {
                context.cr()?;
                context.write_str("<hr />\n")?;
            }
            Ok(())
        }
        NodeValue::CodeBlock(..) => render_code_block(context, node),
        NodeValue::Heading(..) => render_heading(context, node),
        NodeValue::Paragraph => render_paragraph(context, node),
        NodeValue::Alert(..) => render_alert(context, node),
    }
}

fn render_quote<'i>(context: &mut Context<'_, '_>, node: &Block<'i>) -> io::Result<()> {
    context.cr()?;
    context.write_str("<blockquote>\n")?;
    format_children(context, node)?;
    context.cr()?;
    context.write_str("</blockquote>\n")
}

fn render_list<'i>(context: &mut Context<'_, '_>, node: &Block<'i>) -> io::Result<()> {
    let nl = match node.value {
        NodeValue::List(ref nl) => nl,
        _ => unreachable!(),
    };

    context.cr()?;
    match nl.variant {
        ListVariant::Ordered => {
            if nl.start == 1 {
                context.write_str("<ol>\n")?;
            } else {
                write!(context, "<ol start=\"{}\">\n", nl.start)?;
            }
        }
        ListVariant::Unordered => context.write_str("<ul>\n")?,
        ListVariant::Task => context.write_str("<ul class=\"task-list\">\n")?,
    }

    for item in &node.children {
        render_item(context, item, nl.variant == ListVariant::Task, nl.tight)?;
    }

    match nl.variant {
        ListVariant::Ordered => context.write_str("</ol>\n"),
        _ => context.write_str("</ul>\n"),
    }
}

fn render_item<'i>(
    context: &mut Context<'_, '_>,
    node: &Block<'i>,
    task: bool,
    tight: bool,
) -> io::Result<()> {
    let ni = match node.value {
        NodeValue::Item(ref ni) => ni,
        _ => unreachable!(),
    };

    context.cr()?;
    context.write_str("<li>")?;
    if task {
        if ni.checked {
            context.write_str("<input type=\"checkbox\" checked=\"\" disabled=\"\" /> ")?;
        } else {
            context.write_str("<input type=\"checkbox\" disabled=\"\" /> ")?;
        }
    }
    for child in &node.children {
        // Tight lists drop the paragraph wrapper.
        if tight && matches!(child.value, NodeValue::Paragraph) {
            render_inlines(context, &child.inlines)?;
        } else {
            format_node(context, child)?;
        }
    }
    context.write_str("</li>\n")
}

fn render_table<'i>(context: &mut Context<'_, '_>, node: &Block<'i>) -> io::Result<()> {
    let alignments = match node.value {
        NodeValue::Table(ref nt) => &nt.alignments,
        _ => unreachable!(),
    };

    context.cr()?;
    context.write_str("<table>\n")?;
    for row in &node.children {
        let header = match row.value {
            NodeValue::TableRow(header) => header,
            _ => unreachable!(),
        };
        context.write_str("<tr>")?;
        for (i, cell) in row.children.iter().enumerate() {
            let tag = if header { "th" } else { "td" };
            match alignments.get(i).copied().unwrap_or_default() {
                TableAlignment::None => write!(context, "<{}>", tag)?,
                TableAlignment::Left => write!(context, "<{} align=\"left\">", tag)?,
                TableAlignment::Center => write!(context, "<{} align=\"center\">", tag)?,
                TableAlignment::Right => write!(context, "<{} align=\"right\">", tag)?,
            }
            render_inlines(context, &cell.inlines)?;
            write!(context, "</{}>", tag)?;
        }
        context.write_str("</tr>\n")?;
    }
    context.write_str("</table>\n")
}

fn render_code_block<'i>(context: &mut Context<'_, '_>, node: &Block<'i>) -> io::Result<()> {
    let ncb = match node.value {
        NodeValue::CodeBlock(ref ncb) => ncb,
        _ => unreachable!(),
    };

    match ncb.directive {
        Some(Directive::Admonition(severity)) => {
            context.cr()?;
            write!(context, "<div class=\"alert {}\">\n", severity.css_class())?;
            write!(
                context,
                "<p class=\"alert-title\">{}</p>\n",
                severity.default_title()
            )?;
            context.write_str("<p>")?;
            context.escape(ncb.literal.trim_end_matches('\n'))?;
            context.write_str("</p>\n</div>\n")
        }
        Some(Directive::TableOfContents) => {
            let toc = toc::build(context.document());
            context.cr()?;
            render_toc_list(context, &toc.entries)
        }
        None => {
            context.cr()?;
            let lang = ncb.info.split_whitespace().next().unwrap_or("");
            if lang.is_empty() {
                context.write_str("<pre><code>")?;
            } else {
                context.write_str("<pre><code class=\"language-")?;
                context.escape(lang)?;
                context.write_str("\">")?;
            }
            context.escape(&ncb.literal)?;
            context.write_str("</code></pre>\n")
        }
    }
}

fn render_toc_list(context: &mut Context<'_, '_>, entries: &[toc::TocEntry]) -> io::Result<()> {
    if entries.is_empty() {
        return Ok(());
    }
    context.write_str("<ul class=\"toc\">\n")?;
    for entry in entries {
        context.write_str("<li><a href=\"#")?;
        context.escape_href(&entry.anchor)?;
        context.write_str("\">")?;
        context.escape(&entry.text)?;
        context.write_str("</a>")?;
        if !entry.children.is_empty() {
            context.cr()?;
            render_toc_list(context, &entry.children)?;
        }
        context.write_str("</li>\n")?;
    }
    context.write_str("</ul>\n")
}

fn render_heading<'i>(context: &mut Context<'_, '_>, node: &Block<'i>) -> io::Result<()> {
    let nh = match node.value {
        NodeValue::Heading(ref nh) => nh,
        _ => unreachable!(),
    };

    context.cr()?;
    let id = context.anchorize(&nh.text);
    write!(context, "<h{} id=\"{}\">", nh.level, id)?;
    render_inlines(context, &node.inlines)?;
    write!(context, "</h{}>\n", nh.level)
}

fn render_paragraph<'i>(context: &mut Context<'_, '_>, node: &Block<'i>) -> io::Result<()> {
    context.cr()?;
    context.write_str("<p>")?;
    render_inlines(context, &node.inlines)?;
    context.write_str("</p>\n")
}

fn render_alert<'i>(context: &mut Context<'_, '_>, node: &Block<'i>) -> io::Result<()> {
    let severity = match node.value {
        NodeValue::Alert(ref na) => na.severity,
        _ => unreachable!(),
    };

    context.cr()?;
    write!(context, "<div class=\"alert {}\">\n", severity.css_class())?;
    write!(
        context,
        "<p class=\"alert-title\">{}</p>\n",
        severity.default_title()
    )?;
    context.write_str("<p>")?;
    render_inlines(context, &node.inlines)?;
    context.write_str("</p>\n</div>\n")
}

fn render_inlines(context: &mut Context<'_, '_>, inlines: &[Inline]) -> io::Result<()> {
    for inline in inlines {
        match *inline {
            Inline::Text(ref t) => render_text(context, t)?,
            Inline::Codespan(ref body) => {
                context.write_str("<code>")?;
                context.escape(body)?;
                context.write_str("</code>")?;
            }
            Inline::Autolink(ref url) => {
                render_anchor_open(context, url)?;
                context.escape(url.strip_prefix("mailto:").unwrap_or(url))?;
                context.write_str("</a>")?;
            }
            Inline::Link(ref nl) => {
                render_anchor_open(context, &nl.url)?;
                for t in &nl.text {
                    render_text(context, t)?;
                }
                context.write_str("</a>")?;
            }
            Inline::Image(ref ni) => {
                context.write_str("<img src=\"")?;
                if !dangerous_url(&ni.src) {
                    context.escape_href(&ni.src)?;
                }
                context.write_str("\" alt=\"")?;
                for t in &ni.alt {
                    context.escape(&t.text)?;
                }
                context.write_str("\" />")?;
            }
            Inline::LineBreak => context.write_str("<br />\n")?,
        }
    }
    Ok(())
}

fn render_anchor_open(context: &mut Context<'_, '_>, url: &str) -> io::Result<()> {
    context.write_str("<a href=\"")?;
    if !dangerous_url(url) {
        context.escape_href(url)?;
    }
    context.write_str("\">")
}

fn render_text(context: &mut Context<'_, '_>, t: &InlineText) -> io::Result<()> {
    let tags = style_tags(&t.style);
    for (open, _) in &tags {
        context.write_str(open)?;
    }
    if t.style.fg != Color::Default {
        write!(context, "<span style=\"color: {}\">", t.style.fg.css())?;
    }
    context.escape(&t.text)?;
    if t.style.fg != Color::Default {
        context.write_str("</span>")?;
    }
    for (_, close) in tags.iter().rev() {
        context.write_str(close)?;
    }
    Ok(())
}

/// The HTML tag pairs for a style's attribute flags, outermost first.
fn style_tags(style: &TextStyle) -> Vec<(&'static str, &'static str)> {
    let mut tags = Vec::new();
    if style.bold {
        tags.push(("<strong>", "</strong>"));
    }
    if style.italic {
        tags.push(("<em>", "</em>"));
    }
    if style.strike {
        tags.push(("<del>", "</del>"));
    }
    if style.underline {
        tags.push(("<u>", "</u>"));
    }
    tags
}

/// Whether a URL carries a scheme the renderer refuses to emit.
pub fn dangerous_url(input: &str) -> bool {
    let lower = input.trim_start().to_ascii_lowercase();
    (lower.starts_with("javascript:") || lower.starts_with("vbscript:") || lower.starts_with("file:")
        || lower.starts_with("data:"))
        && !(lower.starts_with("data:image/png")
            || lower.starts_with("data:image/gif")
            || lower.starts_with("data:image/jpeg")
            || lower.starts_with("data:image/webp"))
}

/// Writes buffer to output, escaping anything that could be interpreted as
/// an HTML tag.
///
/// Namely:
///
/// * U+0022 QUOTATION MARK " is rendered as &quot;
/// * U+0026 AMPERSAND & is rendered as &amp;
/// * U+003C LESS-THAN SIGN < is rendered as &lt;
/// * U+003E GREATER-THAN SIGN > is rendered as &gt;
/// * Everything else is passed through unchanged.
///
/// Note that this is appropriate and sufficient for free text, but not for
/// URLs in attributes. See [`escape_href`].
pub fn escape(output: &mut dyn Write, buffer: &str) -> io::Result<()> {
    let bytes = buffer.as_bytes();
    let mut offset = 0;

    for (i, &b) in bytes.iter().enumerate() {
        let esc: &str = match b {
            b'"' => "&quot;",
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            _ => continue,
        };
        output.write_all(&bytes[offset..i])?;
        output.write_all(esc.as_bytes())?;
        offset = i + 1;
    }
    output.write_all(&bytes[offset..])?;
    Ok(())
}

/// Writes buffer to output, escaping in a manner appropriate for URLs in
/// HTML attributes. Percent signs pass through so pre-encoded URLs are not
/// double-encoded.
pub fn escape_href(output: &mut dyn Write, buffer: &str) -> io::Result<()> {
    const HREF_SAFE: &[u8] = b"-_.+!*(),%#@?=;:/,+$~";

    let bytes = buffer.as_bytes();
    let size = buffer.len();
    let mut i = 0;

    while i < size {
        let org = i;
        while i < size && (bytes[i].is_ascii_alphanumeric() || HREF_SAFE.contains(&bytes[i])) {
            i += 1;
        }

        if i > org {
            output.write_all(&bytes[org..i])?;
        }

        if i >= size {
            break;
        }

        match bytes[i] {
            b'&' => {
                output.write_all(b"&amp;")?;
            }
            b'\'' => {
                output.write_all(b"&#x27;")?;
            }
            _ => write!(output, "%{:02X}", bytes[i])?,
        }

        i += 1;
    }

    Ok(())
}
