use thiserror::Error;

/// Errors raised when assembling a [`RasterBuffer`](crate::RasterBuffer) from raw parts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RasterError {
    /// Pixel data length is not `width * height * 4`.
    #[error("pixel buffer holds {len} bytes, expected {width}x{height}x4")]
    DimensionMismatch { width: u32, height: u32, len: usize },
    /// Width or height is zero.
    #[error("raster dimensions must be at least 1x1, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },
}

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error(transparent)]
    Raster(#[from] RasterError),
}
