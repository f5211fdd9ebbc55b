//! Sobel gradient stage.

use crate::raster::RasterBuffer;

/// Horizontal Sobel kernel, responds to vertical edges.
///
/// ```text
/// [-1  0  1]
/// [-2  0  2]
/// [-1  0  1]
/// ```
pub const KERNEL_X: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];

/// Vertical Sobel kernel, responds to horizontal edges.
///
/// ```text
/// [-1 -2 -1]
/// [ 0  0  0]
/// [ 1  2  1]
/// ```
pub const KERNEL_Y: [[i32; 3]; 3] = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

/// Computes the horizontal and vertical gradients `(gx, gy)` at an interior pixel.
///
/// The gray value of a pixel is read from its red channel, so `gray` is expected
/// to be the output of [`grayscale`](crate::grayscale). For 8-bit inputs the
/// absolute value of either gradient never exceeds 1020.
///
/// # Panics
///
/// Panics if `(x, y)` is on the border, since the 3x3 window would leave the image.
///
/// # Examples
///
/// ```rust
/// use sobel_bench::{sobel_at, RasterBuffer};
///
/// // Left column black, the rest white: a vertical edge.
/// let gray = RasterBuffer::from_fn(3, 3, |x, _| {
///     let v = if x == 0 { 0 } else { 255 };
///     [v, v, v, 255]
/// })
/// .unwrap();
/// assert_eq!(sobel_at(&gray, 1, 1), (1020, 0));
/// ```
pub fn sobel_at(gray: &RasterBuffer, x: u32, y: u32) -> (i32, i32) {
    assert!(
        x >= 1 && y >= 1 && x + 1 < gray.width() && y + 1 < gray.height(),
        "({x}, {y}) is not an interior pixel of a {}x{} raster",
        gray.width(),
        gray.height()
    );

    let pixels = gray.pixels();
    let mut gx = 0;
    let mut gy = 0;
    for ky in 0..3 {
        for kx in 0..3 {
            let value = pixels[gray.offset(x + kx - 1, y + ky - 1)] as i32;
            gx += value * KERNEL_X[ky as usize][kx as usize];
            gy += value * KERNEL_Y[ky as usize][kx as usize];
        }
    }
    (gx, gy)
}

/// Edge strength `min(255, sqrt(gx² + gy²))`, truncated to `u8`.
#[inline]
pub fn magnitude(gx: i32, gy: i32) -> u8 {
    let squared = (gx * gx + gy * gy) as f32;
    squared.sqrt().min(255.0) as u8
}

/// Replaces every interior pixel of a grayscale buffer with its Sobel magnitude.
///
/// The input buffer is consumed as a read-only snapshot and the result is written
/// into a fresh buffer, so magnitudes already written never feed back into later
/// windows. Only fully covered 3x3 windows are evaluated: the outermost rows and
/// columns keep their grayscale values, and so does the alpha channel of every
/// pixel. Images narrower or shorter than 3 pixels have no interior and come back
/// unchanged.
///
/// # Panics
///
/// Panics if the pixel length invariant of the buffer does not hold.
///
/// # Algorithm
///
/// For every interior pixel `(x, y)`:
///
/// ```text
/// gx = Σ gray(x+kx-1, y+ky-1) * KERNEL_X[ky][kx]
/// gy = Σ gray(x+kx-1, y+ky-1) * KERNEL_Y[ky][kx]
/// out = min(255, sqrt(gx² + gy²))
/// ```
///
/// # Examples
///
/// ```rust
/// use sobel_bench::{gradient, RasterBuffer};
///
/// let flat = RasterBuffer::from_fn(5, 5, |_, _| [90, 90, 90, 255]).unwrap();
/// let edges = gradient(flat);
/// assert_eq!(edges.pixel(2, 2), [0, 0, 0, 255]);
/// assert_eq!(edges.pixel(0, 0), [90, 90, 90, 255]);
/// ```
pub fn gradient(gray: RasterBuffer) -> RasterBuffer {
    gray.assert_invariant();
    let (width, height) = gray.dimensions();
    debug!("sobel gradient on {}x{} raster", width, height);

    if width < 3 || height < 3 {
        return gray;
    }

    let mut output = gray.clone();
    let out = output.pixels_mut();
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let (gx, gy) = sobel_at(&gray, x, y);
            let m = magnitude(gx, gy);
            let idx = gray.offset(x, y);
            out[idx] = m;
            out[idx + 1] = m;
            out[idx + 2] = m;
        }
    }
    output
}
