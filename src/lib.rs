//! # Sobel Edge Detection Benchmark
//!
//! This crate provides a small raster edge detection pipeline (grayscale conversion
//! followed by a 3x3 Sobel gradient) together with a harness that times two
//! implementations of the pipeline stage by stage and compares them.
//!
//! ## Features
//!
//! - RGBA raster buffer with a checked length invariant
//! - Fixed-weight luminance conversion (`0.299 R + 0.587 G + 0.114 B`)
//! - Sobel gradient magnitude over fully covered 3x3 windows
//! - Two interchangeable [`EdgeDetector`] implementations: [`ScalarSobel`] and the
//!   `imageproc`-backed [`ImageprocSobel`]
//! - Per-stage wall-clock timing and a comparison table ([`BenchmarkReport`])
//! - Optional debug logging (enable with `logger` feature)
//! - Optional `serde` support for reports and options (enable with `serde` feature)
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use sobel_bench::{Decoder, EdgeDetector, ImageDecoder, ScalarSobel};
//!
//! let bytes = std::fs::read("example.png").unwrap();
//! let raster = ImageDecoder.decode(&bytes).unwrap();
//!
//! let edges = ScalarSobel.detect(raster);
//! edges.into_rgba_image().save("edges_output.png").unwrap();
//! ```
//!
//! ## Benchmarking
//!
//! ```rust,no_run
//! use std::fs::File;
//! use sobel_bench::{Benchmark, BenchmarkOptions, ImageDecoder, ImageprocSobel, RgbaSink, ScalarSobel};
//!
//! let options = BenchmarkOptions::default().with_repetitions(5);
//! let mut bench = Benchmark::with_parts(ImageDecoder, RgbaSink::new(), options);
//!
//! let report = bench
//!     .run(File::open("example.png").unwrap(), &ImageprocSobel, &ScalarSobel)
//!     .unwrap();
//! println!("{report}");
//! ```
//!
//! ## Optional Features
//!
//! ### Logger Feature
//!
//! Enable debug logging to follow the pipeline stage by stage:
//!
//! ```toml
//! [dependencies]
//! sobel-bench = { version = "0.1.0", features = ["logger"] }
//! log = "0.4"
//! env_logger = "0.11"
//! ```
//!
//! With the feature enabled and a logger installed you'll see messages like:
//!
//! ```text
//! DEBUG sobel_bench::bench: decode took 1.204 ms
//! DEBUG sobel_bench::bench: grayscale took 0.318 ms
//! ```

// Conditional logging macros
#[cfg(feature = "logger")]
macro_rules! debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*);
    };
}

#[cfg(not(feature = "logger"))]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

pub mod bench;
pub mod detector;
pub mod error;
pub mod grayscale;
pub mod io;
pub mod raster;
pub mod report;
pub mod sobel;

pub use bench::{stages, Benchmark, BenchmarkOptions, StageTiming};
pub use detector::{EdgeDetector, ImageprocSobel, ScalarSobel};
pub use error::{PipelineError, RasterError};
pub use grayscale::{grayscale, luminance};
pub use io::{Decoder, ImageDecoder, NullSink, RenderSink, RgbaSink};
pub use raster::RasterBuffer;
pub use report::{BenchmarkReport, Comparison, ReportRow};
pub use sobel::{gradient, magnitude, sobel_at, KERNEL_X, KERNEL_Y};
