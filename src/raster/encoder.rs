use std::io::Write;

use image::{codecs::jpeg::JpegEncoder, ColorType, RgbImage};

use crate::errors::PageError;

pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Serializes one rendered page.
pub trait PageEncoder {
    /// File extension without the dot, used to name page files.
    fn extension(&self) -> &str;

    fn encode(&self, page: &RgbImage, writer: &mut dyn Write) -> Result<(), PageError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegPageEncoder {
    quality: u8,
}

impl JpegPageEncoder {
    /// `quality` is clamped to the 1..=100 range the JPEG encoder accepts.
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }
}

impl Default for JpegPageEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl PageEncoder for JpegPageEncoder {
    fn extension(&self) -> &str {
        "jpg"
    }

    fn encode(&self, page: &RgbImage, writer: &mut dyn Write) -> Result<(), PageError> {
        let mut encoder = JpegEncoder::new_with_quality(writer, self.quality);
        encoder.encode(page.as_raw(), page.width(), page.height(), ColorType::Rgb8)?;
        Ok(())
    }
}
