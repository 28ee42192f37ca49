//! Adapter for the `image` crate decoder plugin.

use crate::adapters::{DecodedImage, ImageDecoderAdapter};

/// Decodes PNG and JPEG bytes into RGB rasters with the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageRsDecoder;

impl ImageRsDecoder {
    /// Construct a new decoder.
    pub fn new() -> Self {
        ImageRsDecoder
    }
}

impl ImageDecoderAdapter for ImageRsDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, String> {
        let img = image::load_from_memory(bytes).map_err(|e| e.to_string())?;
        let rgb = img.to_rgb8();
        Ok(DecodedImage {
            width: rgb.width(),
            height: rgb.height(),
            channels: 3,
            pixels: rgb.into_raw(),
        })
    }
}
