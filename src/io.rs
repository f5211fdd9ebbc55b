//! Decoding input bytes and presenting results.

use image::RgbaImage;

use crate::error::PipelineError;
use crate::raster::RasterBuffer;

/// Turns an encoded image into an RGBA raster.
pub trait Decoder {
    fn decode(&self, bytes: &[u8]) -> Result<RasterBuffer, PipelineError>;
}

/// Decodes any format the `image` crate recognises (PNG, JPEG, ...).
///
/// ```rust,no_run
/// use sobel_bench::{Decoder, ImageDecoder};
///
/// let bytes = std::fs::read("input.png").unwrap();
/// let raster = ImageDecoder.decode(&bytes).unwrap();
/// println!("{}x{}", raster.width(), raster.height());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageDecoder;

impl Decoder for ImageDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<RasterBuffer, PipelineError> {
        let image = image::load_from_memory(bytes)?;
        Ok(RasterBuffer::try_from(image.to_rgba8())?)
    }
}

/// Receives the final raster of a pipeline run.
pub trait RenderSink {
    fn render(&mut self, buffer: RasterBuffer);
}

/// Keeps the most recently rendered frame as an [`RgbaImage`].
#[derive(Debug, Clone, Default)]
pub struct RgbaSink {
    frame: Option<RgbaImage>,
}

impl RgbaSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last rendered frame, if any.
    pub fn frame(&self) -> Option<&RgbaImage> {
        self.frame.as_ref()
    }

    pub fn take_frame(&mut self) -> Option<RgbaImage> {
        self.frame.take()
    }
}

impl RenderSink for RgbaSink {
    fn render(&mut self, buffer: RasterBuffer) {
        self.frame = Some(buffer.into_rgba_image());
    }
}

/// Drops every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn render(&mut self, _buffer: RasterBuffer) {}
}
