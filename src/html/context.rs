use crate::html::{self, Anchorizer};
use crate::nodes::Block;
use crate::parser::options::Options;

use std::io::{self, Write};

/// Context carried through one HTML render. Output is appended through
/// this struct's [`Write`] interface.
pub struct Context<'o, 'i> {
    output: &'o mut dyn Write,
    last_was_lf: bool,
    document: &'o Block<'i>,

    /// [`Options`] in use in this render.
    pub options: &'o Options,
    /// [`Anchorizer`] instance used in this render.
    pub anchorizer: Anchorizer,
}

impl<'o, 'i> Context<'o, 'i> {
    pub(super) fn new(
        output: &'o mut dyn Write,
        options: &'o Options,
        document: &'o Block<'i>,
    ) -> Self {
        Context {
            output,
            last_was_lf: true,
            document,
            options,
            anchorizer: Anchorizer::new(),
        }
    }

    /// The root of the tree being rendered; directive expansion (the table
    /// of contents) walks it.
    pub fn document(&self) -> &'o Block<'i> {
        self.document
    }

    /// If the last byte written was **not** a U+000A LINE FEED, writes
    /// one. Otherwise, does nothing.
    ///
    /// (In other words, ensures the output is at a new line.)
    pub fn cr(&mut self) -> io::Result<()> {
        if !self.last_was_lf {
            self.write_str("\n")?;
        }
        Ok(())
    }

    pub fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.write_all(s.as_bytes())
    }

    /// Convenience wrapper for [`html::escape`].
    pub fn escape(&mut self, buffer: &str) -> io::Result<()> {
        html::escape(self, buffer)
    }

    /// Convenience wrapper for [`html::escape_href`].
    pub fn escape_href(&mut self, buffer: &str) -> io::Result<()> {
        html::escape_href(self, buffer)
    }

    /// A unique anchor slug for the given heading text.
    pub fn anchorize(&mut self, text: &str) -> String {
        self.anchorizer.anchorize(text)
    }
}

impl<'o, 'i> Write for Context<'o, 'i> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(&last) = buf.last() {
            self.last_was_lf = last == b'\n';
        }
        self.output.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }
}
