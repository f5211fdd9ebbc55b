//! RGBA pixel storage shared by every pipeline stage.

use image::RgbaImage;

use crate::error::RasterError;

/// Number of interleaved channels per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Row-major RGBA8 image with no row padding.
///
/// The pixel vector always holds exactly `width * height * 4` bytes. The
/// only way to build a buffer from untrusted parts is [`RasterBuffer::new`],
/// which rejects anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterBuffer {
    /// Wraps raw RGBA bytes, validating the length invariant.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sobel_bench::RasterBuffer;
    ///
    /// let raster = RasterBuffer::new(2, 1, vec![0; 8]).unwrap();
    /// assert_eq!(raster.dimensions(), (2, 1));
    ///
    /// assert!(RasterBuffer::new(2, 2, vec![0; 8]).is_err());
    /// ```
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::ZeroDimension { width, height });
        }
        if pixels.len() != expected_len(width, height) {
            return Err(RasterError::DimensionMismatch {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Builds a buffer where every pixel is produced by `f(x, y)` as `[r, g, b, a]`.
    ///
    /// Zero dimensions are rejected the same way [`RasterBuffer::new`] rejects them.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self, RasterError>
    where
        F: FnMut(u32, u32) -> [u8; 4],
    {
        let mut pixels = Vec::with_capacity(expected_len(width, height));
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&f(x, y));
            }
        }
        Self::new(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` pair.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable access to the channel bytes. The length cannot change through a slice,
    /// so the invariant survives.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Byte offset of pixel `(x, y)`.
    #[inline]
    pub fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// The RGBA quadruple at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Panics when the length invariant does not hold.
    ///
    /// Every stage calls this at its boundary; a violation is a programmer
    /// error and is never recovered from.
    #[inline]
    pub(crate) fn assert_invariant(&self) {
        assert_eq!(
            self.pixels.len(),
            expected_len(self.width, self.height),
            "raster buffer of {}x{} holds {} bytes",
            self.width,
            self.height,
            self.pixels.len()
        );
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }

    /// Converts into an `image` crate buffer for saving or further processing.
    pub fn into_rgba_image(self) -> RgbaImage {
        let (width, height) = self.dimensions();
        // Length already matches, so from_raw cannot fail.
        match RgbaImage::from_raw(width, height, self.pixels) {
            Some(image) => image,
            None => unreachable!("raster length invariant violated"),
        }
    }
}

impl TryFrom<RgbaImage> for RasterBuffer {
    type Error = RasterError;

    fn try_from(image: RgbaImage) -> Result<Self, Self::Error> {
        let (width, height) = image.dimensions();
        Self::new(width, height, image.into_raw())
    }
}

#[inline]
fn expected_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_length_mismatch() {
        let err = RasterBuffer::new(3, 3, vec![0; 35]).unwrap_err();
        assert_eq!(
            err,
            RasterError::DimensionMismatch {
                width: 3,
                height: 3,
                len: 35
            }
        );
    }

    #[test]
    fn rejects_zero_dimension() {
        assert_eq!(
            RasterBuffer::new(0, 4, Vec::new()).unwrap_err(),
            RasterError::ZeroDimension {
                width: 0,
                height: 4
            }
        );
    }

    #[test]
    fn from_fn_is_row_major() {
        let raster = RasterBuffer::from_fn(3, 2, |x, y| [x as u8, y as u8, 0, 255]).unwrap();
        assert_eq!(raster.pixel(2, 1), [2, 1, 0, 255]);
        assert_eq!(raster.offset(2, 1), (3 + 2) * 4);
        assert_eq!(raster.pixels().len(), 24);
    }

    #[test]
    fn rgba_image_conversion_keeps_pixels() {
        let image = RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 40]));
        let raster = RasterBuffer::try_from(image.clone()).unwrap();
        assert_eq!(raster.dimensions(), (4, 2));
        assert_eq!(raster.pixel(3, 1), [10, 20, 30, 40]);
        assert_eq!(raster.into_rgba_image(), image);
    }
}
