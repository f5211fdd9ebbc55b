//! Stage timing and the two-run benchmark harness.

use std::io::Read;
use std::time::Instant;

use crate::detector::EdgeDetector;
use crate::error::PipelineError;
use crate::io::{Decoder, ImageDecoder, NullSink, RenderSink};
use crate::report::BenchmarkReport;

/// Names of the stages the harness times.
pub mod stages {
    /// Reading the encoded input. Recorded once, in the reference run.
    pub const READ: &str = "read";
    pub const DECODE: &str = "decode";
    /// Only recorded for detectors that do not fuse grayscale into edge detection.
    pub const GRAYSCALE: &str = "grayscale";
    pub const EDGE_DETECT: &str = "edge_detect";
    pub const RENDER: &str = "render";
    /// Decode through render, excluding [`READ`].
    pub const TOTAL: &str = "total";
}

/// Wall-clock duration of one stage of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageTiming {
    pub stage_name: String,
    pub duration_ms: f64,
}

impl StageTiming {
    pub fn new(stage_name: impl Into<String>, duration_ms: f64) -> Self {
        Self {
            stage_name: stage_name.into(),
            duration_ms,
        }
    }
}

/// Records stage durations in execution order.
struct StageTimer {
    started: Instant,
    timings: Vec<StageTiming>,
}

impl StageTimer {
    fn new() -> Self {
        Self {
            started: Instant::now(),
            timings: Vec::new(),
        }
    }

    /// Runs `f` and records how long it took under `name`.
    fn time<T>(&mut self, name: &str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let value = f();
        let duration_ms = start.elapsed().as_secs_f64() * 1_000.0;
        debug!("{} took {:.3} ms", name, duration_ms);
        self.timings.push(StageTiming::new(name, duration_ms));
        value
    }

    /// Appends the [`stages::TOTAL`] entry and returns every timing.
    fn finish(mut self) -> Vec<StageTiming> {
        let total_ms = self.started.elapsed().as_secs_f64() * 1_000.0;
        self.timings.push(StageTiming::new(stages::TOTAL, total_ms));
        self.timings
    }
}

/// Mean duration per stage over several runs of the same pipeline.
///
/// Stage order is taken from the first run.
fn average(runs: &[Vec<StageTiming>]) -> Vec<StageTiming> {
    let Some(first) = runs.first() else {
        return Vec::new();
    };
    first
        .iter()
        .map(|timing| {
            let samples: Vec<f64> = runs
                .iter()
                .filter_map(|run| run.iter().find(|t| t.stage_name == timing.stage_name))
                .map(|t| t.duration_ms)
                .collect();
            let mean = samples.iter().sum::<f64>() / samples.len() as f64;
            StageTiming::new(timing.stage_name.clone(), mean)
        })
        .collect()
}

/// Harness settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BenchmarkOptions {
    /// How many times each pipeline runs; stage durations are averaged.
    /// Zero is treated as one.
    pub repetitions: u32,
    /// Whether to hand the result to the render sink and time it.
    pub render: bool,
}

impl Default for BenchmarkOptions {
    fn default() -> Self {
        Self {
            repetitions: 1,
            render: true,
        }
    }
}

impl BenchmarkOptions {
    pub fn with_repetitions(mut self, repetitions: u32) -> Self {
        self.repetitions = repetitions;
        self
    }

    pub fn with_render(mut self, render: bool) -> Self {
        self.render = render;
        self
    }
}

/// Runs a reference and a local edge detector over the same input and compares
/// their stage timings.
///
/// The two pipelines run one after the other, never concurrently. Pixel output is
/// not compared, only durations.
///
/// # Examples
///
/// ```rust,no_run
/// use std::fs::File;
/// use sobel_bench::{Benchmark, ImageprocSobel, ScalarSobel};
///
/// let mut bench = Benchmark::new();
/// bench
///     .run(File::open("input.png").unwrap(), &ImageprocSobel, &ScalarSobel)
///     .unwrap();
///
/// println!("{}", bench.get_report().unwrap());
/// ```
#[derive(Debug)]
pub struct Benchmark<D = ImageDecoder, S = NullSink> {
    decoder: D,
    sink: S,
    options: BenchmarkOptions,
    report: Option<BenchmarkReport>,
}

impl Benchmark {
    /// Harness with the `image` crate decoder, a discarding sink and default options.
    pub fn new() -> Self {
        Self::with_parts(ImageDecoder, NullSink, BenchmarkOptions::default())
    }
}

impl Default for Benchmark {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Decoder, S: RenderSink> Benchmark<D, S> {
    pub fn with_parts(decoder: D, sink: S, options: BenchmarkOptions) -> Self {
        Self {
            decoder,
            sink,
            options,
            report: None,
        }
    }

    pub fn options(&self) -> &BenchmarkOptions {
        &self.options
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// The report of the last successful [`Benchmark::run`], if any.
    pub fn get_report(&self) -> Option<&BenchmarkReport> {
        self.report.as_ref()
    }

    /// Reads `input`, then runs `reference` and `local` to completion in that order.
    ///
    /// Any I/O or decode failure aborts the whole benchmark; the previous report,
    /// if there is one, is left in place.
    pub fn run<R, A, B>(
        &mut self,
        mut input: R,
        reference: &A,
        local: &B,
    ) -> Result<&BenchmarkReport, PipelineError>
    where
        R: Read,
        A: EdgeDetector + ?Sized,
        B: EdgeDetector + ?Sized,
    {
        let mut reader = StageTimer::new();
        let mut bytes = Vec::new();
        reader.time(stages::READ, || input.read_to_end(&mut bytes))?;
        debug!("read {} input bytes", bytes.len());

        let mut reference_timings = reader.timings;
        reference_timings.extend(self.measure(&bytes, reference)?);
        let local_timings = self.measure(&bytes, local)?;

        let report = BenchmarkReport::compare(&reference_timings, &local_timings)
            .with_labels(reference.name(), local.name());
        Ok(self.report.insert(report))
    }

    /// Runs one detector `repetitions` times and averages its stage timings.
    fn measure<E>(&mut self, bytes: &[u8], detector: &E) -> Result<Vec<StageTiming>, PipelineError>
    where
        E: EdgeDetector + ?Sized,
    {
        let repetitions = self.options.repetitions.max(1);
        debug!("running {} pipeline {} time(s)", detector.name(), repetitions);
        let mut runs = Vec::with_capacity(repetitions as usize);
        for _ in 0..repetitions {
            runs.push(self.run_pipeline(bytes, detector)?);
        }
        Ok(average(&runs))
    }

    /// Decode, edge detection and render, each timed.
    fn run_pipeline<E>(&mut self, bytes: &[u8], detector: &E) -> Result<Vec<StageTiming>, PipelineError>
    where
        E: EdgeDetector + ?Sized,
    {
        let mut timer = StageTimer::new();

        let raster = timer.time(stages::DECODE, || self.decoder.decode(bytes))?;
        let edges = if detector.fuses_grayscale() {
            timer.time(stages::EDGE_DETECT, || detector.detect(raster))
        } else {
            let gray = timer.time(stages::GRAYSCALE, || detector.grayscale(raster));
            timer.time(stages::EDGE_DETECT, || detector.gradient(gray))
        };

        if self.options.render {
            let sink = &mut self.sink;
            timer.time(stages::RENDER, || sink.render(edges));
        }

        Ok(timer.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::{ImageprocSobel, ScalarSobel};
    use crate::raster::RasterBuffer;

    /// Treats the input bytes as a square gray image, no real decoding.
    struct SquareDecoder;

    impl Decoder for SquareDecoder {
        fn decode(&self, bytes: &[u8]) -> Result<RasterBuffer, PipelineError> {
            let side = (bytes.len() as f64).sqrt() as u32;
            let pixels = bytes
                .iter()
                .take((side * side) as usize)
                .flat_map(|&v| [v, v, v, 255])
                .collect();
            Ok(RasterBuffer::new(side, side, pixels)?)
        }
    }

    #[derive(Default)]
    struct CountingSink(usize);

    impl RenderSink for CountingSink {
        fn render(&mut self, _buffer: RasterBuffer) {
            self.0 += 1;
        }
    }

    fn names(timings: &[StageTiming]) -> Vec<&str> {
        timings.iter().map(|t| t.stage_name.as_str()).collect()
    }

    #[test]
    fn timer_records_in_execution_order() {
        let mut timer = StageTimer::new();
        let doubled = timer.time("a", || 21 * 2);
        timer.time("b", || ());
        let timings = timer.finish();

        assert_eq!(doubled, 42);
        assert_eq!(names(&timings), ["a", "b", stages::TOTAL]);
        assert!(timings.iter().all(|t| t.duration_ms >= 0.0));
    }

    #[test]
    fn average_takes_mean_per_stage() {
        let runs = vec![
            vec![StageTiming::new("x", 1.0), StageTiming::new("y", 4.0)],
            vec![StageTiming::new("x", 3.0), StageTiming::new("y", 8.0)],
        ];
        let mean = average(&runs);
        assert_eq!(mean, vec![StageTiming::new("x", 2.0), StageTiming::new("y", 6.0)]);
        assert!(average(&[]).is_empty());
    }

    #[test]
    fn stage_layout_follows_detector_fusion() {
        let mut bench = Benchmark::with_parts(
            SquareDecoder,
            CountingSink::default(),
            BenchmarkOptions::default(),
        );
        let report = bench.run(&[128u8; 25][..], &ImageprocSobel, &ScalarSobel).unwrap();

        let reference: Vec<_> = report
            .rows()
            .iter()
            .filter(|r| r.reference.is_some())
            .map(|r| r.stage_name.as_str())
            .collect();
        assert_eq!(
            reference,
            [stages::READ, stages::DECODE, stages::EDGE_DETECT, stages::RENDER, stages::TOTAL]
        );

        let local: Vec<_> = report
            .rows()
            .iter()
            .filter(|r| r.local.is_some())
            .map(|r| r.stage_name.as_str())
            .collect();
        assert_eq!(
            local,
            [stages::DECODE, stages::EDGE_DETECT, stages::RENDER, stages::TOTAL, stages::GRAYSCALE]
        );
        assert_eq!(report.reference_label(), "imageproc");
        assert_eq!(report.local_label(), "scalar");
        assert_eq!(bench.sink().0, 2);
    }

    #[test]
    fn repetitions_and_render_switch() {
        let options = BenchmarkOptions::default()
            .with_repetitions(3)
            .with_render(false);
        let mut bench = Benchmark::with_parts(SquareDecoder, CountingSink::default(), options);
        let report = bench.run(&[0u8; 16][..], &ScalarSobel, &ScalarSobel).unwrap();

        assert!(report.row(stages::RENDER).is_none());
        assert_eq!(bench.sink().0, 0);
    }

    #[test]
    fn zero_repetitions_still_run_once() {
        let options = BenchmarkOptions::default().with_repetitions(0);
        let mut bench = Benchmark::with_parts(SquareDecoder, CountingSink::default(), options);
        bench.run(&[0u8; 9][..], &ScalarSobel, &ScalarSobel).unwrap();
        assert_eq!(bench.sink().0, 2);
    }

    #[test]
    fn failed_run_keeps_previous_report() {
        let mut bench = Benchmark::new();
        assert!(bench.get_report().is_none());

        let err = bench
            .run(&b"not an image"[..], &ImageprocSobel, &ScalarSobel)
            .unwrap_err();
        assert!(matches!(err, PipelineError::Decode(_)));
        assert!(bench.get_report().is_none());
    }

    #[test]
    fn detectors_can_be_trait_objects() {
        let detectors: [&dyn EdgeDetector; 2] = [&ImageprocSobel, &ScalarSobel];
        let mut bench = Benchmark::with_parts(SquareDecoder, NullSink, BenchmarkOptions::default());
        let report = bench.run(&[7u8; 36][..], detectors[0], detectors[1]).unwrap();
        assert!(report.row(stages::GRAYSCALE).unwrap().reference.is_none());
    }
}
