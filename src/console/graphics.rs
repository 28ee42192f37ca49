//! Kitty graphics protocol emission.
//!
//! Images travel in-band as base64 payloads chunked into escape
//! sequences: `ESC _ G <k=v,...> ; <payload> ESC \`. Every chunk's
//! payload is at most [`CHUNK_SIZE`] bytes, every chunk except the final
//! one carries `m=1`, and the final one carries `m=0`.

use std::io::{self, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Maximum base64 payload bytes per escape.
pub const CHUNK_SIZE: usize = 4096;

/// Where the image bytes come from and how the terminal should read them.
pub enum ImageData<'a> {
    /// A complete PNG file; the terminal decodes it itself (`f=100`).
    Png(&'a [u8]),

    /// Raw 24-bit RGB pixels (`f=24`), with pixel dimensions in `s`/`v`.
    Rgb {
        width: u32,
        height: u32,
        pixels: &'a [u8],
    },
}

/// Transmit and display an image sized to `cols` by `rows` cells.
pub fn emit(output: &mut dyn Write, data: &ImageData, cols: usize, rows: usize) -> io::Result<()> {
    let (keys, bytes) = match *data {
        ImageData::Png(bytes) => (format!("a=T,f=100,c={},r={}", cols, rows), bytes),
        ImageData::Rgb {
            width,
            height,
            pixels,
        } => (
            format!("a=T,f=24,s={},v={},c={},r={}", width, height, cols, rows),
            pixels,
        ),
    };

    let payload = STANDARD.encode(bytes);
    let chunks: Vec<&[u8]> = payload.as_bytes().chunks(CHUNK_SIZE).collect();

    for (i, chunk) in chunks.iter().enumerate() {
        let first = i == 0;
        let last = i == chunks.len() - 1;
        let m = if last { 0 } else { 1 };

        output.write_all(b"\x1b_G")?;
        if first {
            write!(output, "{},m={}", keys, m)?;
        } else {
            write!(output, "m={}", m)?;
        }
        output.write_all(b";")?;
        output.write_all(chunk)?;
        output.write_all(b"\x1b\\")?;
    }

    Ok(())
}

/// Fit an image of `px_w` by `px_h` pixels into at most `max_cols`
/// columns, preserving aspect ratio with the terminal's pixel-per-cell
/// ratio. Returns `(cols, rows)`, or `None` when the terminal reported no
/// pixel size.
pub fn fit(
    px_w: u32,
    px_h: u32,
    max_cols: usize,
    terminal_size: (u16, u16),
    terminal_pixel_size: (u16, u16),
) -> Option<(usize, usize)> {
    if px_w == 0 || px_h == 0 {
        return None;
    }
    let (term_cols, term_rows) = (terminal_size.0 as usize, terminal_size.1 as usize);
    let (term_px_w, term_px_h) = (
        terminal_pixel_size.0 as usize,
        terminal_pixel_size.1 as usize,
    );
    if term_cols == 0 || term_rows == 0 || term_px_w == 0 || term_px_h == 0 {
        return None;
    }

    let cell_w = term_px_w / term_cols;
    let cell_h = term_px_h / term_rows;
    if cell_w == 0 || cell_h == 0 {
        return None;
    }

    let native_cols = (px_w as usize).div_ceil(cell_w);
    let cols = native_cols.min(max_cols).max(1);
    // Scale height by the same factor the width was scaled by.
    let shown_px_w = cols * cell_w;
    let shown_px_h = (px_h as usize * shown_px_w) / px_w as usize;
    let rows = shown_px_h.div_ceil(cell_h).max(1);

    Some((cols, rows))
}
