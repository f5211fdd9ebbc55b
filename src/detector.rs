//! Edge detector implementations compared by the benchmark harness.

use image::{GrayImage, Luma};
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

use crate::grayscale::{self, luminance};
use crate::raster::{RasterBuffer, CHANNELS};
use crate::sobel::{self, magnitude};

/// A grayscale + gradient pipeline that can be timed by [`Benchmark`](crate::Benchmark).
///
/// Both stages consume their input buffer and hand back the result, so each
/// stage owns the pixels exclusively while it runs. Implementations must keep
/// the observable semantics of [`grayscale`](crate::grayscale) and
/// [`gradient`](crate::gradient); the harness never checks their output.
pub trait EdgeDetector {
    /// Short label used in logs.
    fn name(&self) -> &str;

    /// Writes the luminance of every pixel into R, G and B.
    fn grayscale(&self, buffer: RasterBuffer) -> RasterBuffer;

    /// Replaces interior pixels of a grayscale buffer with their Sobel magnitude.
    fn gradient(&self, buffer: RasterBuffer) -> RasterBuffer;

    /// Whether grayscale conversion happens inside edge detection.
    ///
    /// When `true` the harness times [`EdgeDetector::detect`] as a single
    /// `edge_detect` stage and records no separate `grayscale` stage.
    fn fuses_grayscale(&self) -> bool {
        false
    }

    /// Full edge detection on an RGBA buffer.
    fn detect(&self, buffer: RasterBuffer) -> RasterBuffer {
        self.gradient(self.grayscale(buffer))
    }
}

/// Straightforward single-threaded implementation of both stages.
///
/// ```rust
/// use sobel_bench::{EdgeDetector, RasterBuffer, ScalarSobel};
///
/// let image = RasterBuffer::from_fn(4, 4, |_, _| [0, 0, 0, 255]).unwrap();
/// let edges = ScalarSobel.detect(image);
/// assert!(edges.pixels().chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarSobel;

impl EdgeDetector for ScalarSobel {
    fn name(&self) -> &str {
        "scalar"
    }

    fn grayscale(&self, buffer: RasterBuffer) -> RasterBuffer {
        grayscale::grayscale(buffer)
    }

    fn gradient(&self, buffer: RasterBuffer) -> RasterBuffer {
        sobel::gradient(buffer)
    }
}

/// Reference implementation built on `imageproc` gradient filters.
///
/// Edge detection converts RGBA to a single-channel [`GrayImage`] and runs
/// `imageproc`'s horizontal and vertical Sobel filters over it, without a
/// separate grayscale pass over the RGBA buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageprocSobel;

impl ImageprocSobel {
    /// Combines `imageproc` gradients into `output`, interior pixels only.
    fn write_magnitudes(gray: &GrayImage, output: &mut RasterBuffer) {
        let (width, height) = gray.dimensions();
        if width < 3 || height < 3 {
            return;
        }

        let gx = horizontal_sobel(gray);
        let gy = vertical_sobel(gray);

        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let m = magnitude(gx.get_pixel(x, y)[0] as i32, gy.get_pixel(x, y)[0] as i32);
                let idx = output.offset(x, y);
                let out = output.pixels_mut();
                out[idx] = m;
                out[idx + 1] = m;
                out[idx + 2] = m;
            }
        }
    }
}

impl EdgeDetector for ImageprocSobel {
    fn name(&self) -> &str {
        "imageproc"
    }

    fn grayscale(&self, buffer: RasterBuffer) -> RasterBuffer {
        buffer.assert_invariant();
        let (width, height) = buffer.dimensions();
        let mut image = buffer.into_rgba_image();
        for px in image.pixels_mut() {
            let y = luminance(px[0], px[1], px[2]);
            px[0] = y;
            px[1] = y;
            px[2] = y;
        }
        match RasterBuffer::try_from(image) {
            Ok(gray) => gray,
            Err(err) => unreachable!("{width}x{height} raster lost its shape: {err}"),
        }
    }

    fn gradient(&self, buffer: RasterBuffer) -> RasterBuffer {
        buffer.assert_invariant();
        let (width, height) = buffer.dimensions();
        let gray = GrayImage::from_fn(width, height, |x, y| Luma([buffer.pixel(x, y)[0]]));

        let mut output = buffer;
        Self::write_magnitudes(&gray, &mut output);
        output
    }

    fn fuses_grayscale(&self) -> bool {
        true
    }

    fn detect(&self, buffer: RasterBuffer) -> RasterBuffer {
        buffer.assert_invariant();
        let (width, height) = buffer.dimensions();
        debug!("imageproc sobel on {}x{} raster", width, height);

        let gray = GrayImage::from_fn(width, height, |x, y| {
            let [r, g, b, _] = buffer.pixel(x, y);
            Luma([luminance(r, g, b)])
        });

        let mut output = buffer;
        for (px, luma) in output
            .pixels_mut()
            .chunks_exact_mut(CHANNELS)
            .zip(gray.as_raw())
        {
            px[0] = *luma;
            px[1] = *luma;
            px[2] = *luma;
        }
        Self::write_magnitudes(&gray, &mut output);
        output
    }
}
