use std::fs::File;

use env_logger::Builder;
use log::{error, info};
use sobel_bench::{Benchmark, BenchmarkOptions, ImageDecoder, ImageprocSobel, RgbaSink, ScalarSobel};

fn main() {
    Builder::from_default_env().format_timestamp_nanos().init();

    let mut args = std::env::args().skip(1);
    let input = args.next().unwrap_or_else(|| "test_image/edge.png".to_string());
    let output = args.next().unwrap_or_else(|| "test_image/sobel_edges.png".to_string());

    let options = BenchmarkOptions::default().with_repetitions(5);
    let mut bench = Benchmark::with_parts(ImageDecoder, RgbaSink::new(), options);

    let file = File::open(&input).unwrap();
    info!("benchmarking {input}");

    match bench.run(file, &ImageprocSobel, &ScalarSobel) {
        Ok(report) => println!("{report}"),
        Err(err) => {
            error!("benchmark failed: {err}");
            std::process::exit(1);
        }
    }

    if let Some(frame) = bench.sink_mut().take_frame() {
        frame.save(&output).unwrap();
        info!("edges written to {output}");
    }
}
