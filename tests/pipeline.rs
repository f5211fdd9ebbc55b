use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use sobel_bench::{
    stages, Benchmark, BenchmarkOptions, Comparison, Decoder, EdgeDetector, ImageDecoder,
    ImageprocSobel, PipelineError, RasterBuffer, RgbaSink, ScalarSobel,
};

fn encode_png(image: RgbaImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn centered_block() -> RgbaImage {
    RgbaImage::from_fn(4, 4, |x, y| {
        if (1..=2).contains(&x) && (1..=2).contains(&y) {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    })
}

fn channel(raster: &RasterBuffer, x: u32, y: u32) -> u8 {
    raster.pixel(x, y)[0]
}

#[test]
fn black_image_stays_black() {
    let bytes = encode_png(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255])));
    let raster = ImageDecoder.decode(&bytes).unwrap();

    let gray = ScalarSobel.grayscale(raster);
    assert!(gray.pixels().chunks_exact(4).all(|px| px == [0, 0, 0, 255]));

    let edges = ScalarSobel.gradient(gray);
    assert!(edges.pixels().chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
}

#[test]
fn bright_block_lights_up_the_interior() {
    let bytes = encode_png(centered_block());
    let raster = ImageDecoder.decode(&bytes).unwrap();

    for edges in [
        ScalarSobel.detect(raster.clone()),
        ImageprocSobel.detect(raster),
    ] {
        for y in 0..4 {
            for x in 0..4 {
                let interior = (1..=2).contains(&x) && (1..=2).contains(&y);
                let value = channel(&edges, x, y);
                if interior {
                    assert!(value > 0, "({x}, {y}) should be an edge");
                } else {
                    assert_eq!(value, 0, "({x}, {y}) should stay black");
                }
                assert_eq!(edges.pixel(x, y)[3], 255);
            }
        }
    }
}

#[test]
fn benchmark_reports_every_stage() {
    let bytes = encode_png(centered_block());
    let options = BenchmarkOptions::default().with_repetitions(2);
    let mut bench = Benchmark::with_parts(ImageDecoder, RgbaSink::new(), options);

    let report = bench
        .run(Cursor::new(bytes), &ImageprocSobel, &ScalarSobel)
        .unwrap()
        .clone();

    for stage in [stages::DECODE, stages::EDGE_DETECT, stages::RENDER, stages::TOTAL] {
        let row = report.row(stage).unwrap();
        assert!(row.reference.is_some() && row.local.is_some(), "{stage}");
        assert_ne!(row.comparison, Comparison::NotApplicable);
    }
    for stage in [stages::READ, stages::GRAYSCALE] {
        assert_eq!(report.row(stage).unwrap().comparison, Comparison::NotApplicable);
    }

    assert_eq!(bench.get_report(), Some(&report));

    // The last frame rendered comes from the local run.
    let frame = bench.sink().frame().unwrap();
    assert_eq!(frame.dimensions(), (4, 4));
    assert_eq!(frame.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
    assert_eq!(frame.get_pixel(1, 1)[0], 255);

    let table = report.to_string();
    assert!(table.starts_with("stage"));
    assert_eq!(table.lines().count(), 1 + report.rows().len());
}

#[test]
fn truncated_input_aborts_the_run() {
    let mut bytes = encode_png(centered_block());
    bytes.truncate(bytes.len() / 2);

    let mut bench = Benchmark::new();
    let result = bench.run(Cursor::new(bytes), &ImageprocSobel, &ScalarSobel);
    assert!(matches!(result, Err(PipelineError::Decode(_))));
    assert!(bench.get_report().is_none());
}
