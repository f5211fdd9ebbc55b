//! Luminance conversion.

use crate::raster::{RasterBuffer, CHANNELS};

/// Red weight of the luminance sum, in thousandths.
const WEIGHT_R: u32 = 299;
/// Green weight of the luminance sum, in thousandths.
const WEIGHT_G: u32 = 587;
/// Blue weight of the luminance sum, in thousandths.
const WEIGHT_B: u32 = 114;

/// Luminance of one RGB triple: `R*0.299 + G*0.587 + B*0.114`, truncated to `u8`.
///
/// The weights are applied in fixed point (thousandths) so that truncation is
/// exact: a uniform gray `c` maps back to `c`, and pure white stays at 255
/// instead of drifting to 254 through floating point rounding.
///
/// # Examples
///
/// ```rust
/// use sobel_bench::luminance;
///
/// assert_eq!(luminance(255, 255, 255), 255);
/// assert_eq!(luminance(100, 100, 100), 100);
/// assert_eq!(luminance(255, 0, 0), 76);
/// ```
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let weighted = WEIGHT_R * r as u32 + WEIGHT_G * g as u32 + WEIGHT_B * b as u32;
    // Weights sum to 1000, so the quotient never exceeds 255.
    (weighted / 1000) as u8
}

/// Converts an RGBA buffer to grayscale.
///
/// The input buffer is consumed and returned with the luminance of every pixel
/// written to its R, G and B channels. Alpha is left untouched.
///
/// # Panics
///
/// Panics if the pixel length invariant of the buffer does not hold.
///
/// # Examples
///
/// ```rust
/// use sobel_bench::{grayscale, RasterBuffer};
///
/// let rgba = RasterBuffer::new(1, 1, vec![255, 0, 0, 7]).unwrap();
/// let gray = grayscale(rgba);
/// assert_eq!(gray.pixels(), &[76, 76, 76, 7]);
/// ```
pub fn grayscale(mut buffer: RasterBuffer) -> RasterBuffer {
    buffer.assert_invariant();
    debug!(
        "grayscale {}x{} raster",
        buffer.width(),
        buffer.height()
    );

    for px in buffer.pixels_mut().chunks_exact_mut(CHANNELS) {
        let y = luminance(px[0], px[1], px[2]);
        px[0] = y;
        px[1] = y;
        px[2] = y;
    }
    buffer
}
