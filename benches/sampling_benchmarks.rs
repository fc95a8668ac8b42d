//! Benchmarks for time-point scheduling, frame normalization, and GIF
//! assembly.
//!
//! Run with: cargo bench
//!
//! The end-to-end conversion benchmark requires a fixture file at
//! `tests/fixtures/sample_video.mp4` and is skipped when it is absent.

use std::{path::Path, time::Duration};

use criterion::Criterion;
use image::{DynamicImage, Rgba, RgbaImage};
use regif::{ContainerWriter, GifSettings, GifWriter, TimePoint, resize, schedule};

const SAMPLE_VIDEO: &str = "tests/fixtures/sample_video.mp4";

fn benchmark_scheduling(criterion: &mut Criterion) {
    let duration = TimePoint::from_seconds(5400.0);

    criterion.bench_function("schedule 100 points", |bencher| {
        bencher.iter(|| schedule(duration, 100).unwrap());
    });

    criterion.bench_function("schedule 10000 points", |bencher| {
        bencher.iter(|| schedule(duration, 10_000).unwrap());
    });
}

fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    }))
}

fn benchmark_normalization(criterion: &mut Criterion) {
    criterion.bench_function("normalize pass-through 1280x720", |bencher| {
        bencher.iter_batched(
            || gradient(1280, 720),
            |frame| resize::normalize(frame, (1280, 720)),
            criterion::BatchSize::LargeInput,
        );
    });

    criterion.bench_function("normalize downscale 1280x720 -> 320x180", |bencher| {
        bencher.iter_batched(
            || gradient(1280, 720),
            |frame| resize::normalize(frame, (320, 180)),
            criterion::BatchSize::LargeInput,
        );
    });
}

fn benchmark_gif_assembly(criterion: &mut Criterion) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("bench.gif");
    let frames: Vec<DynamicImage> = (0..10).map(|_| gradient(160, 90)).collect();

    criterion.bench_function("assemble 10-frame 160px GIF", |bencher| {
        bencher.iter(|| {
            let mut writer =
                GifWriter::create(&path, (160, 90), 10, Duration::from_millis(100), 0).unwrap();
            for frame in &frames {
                writer.append(frame).unwrap();
            }
            writer.finalize().unwrap();
        });
    });
}

fn benchmark_end_to_end(criterion: &mut Criterion) {
    if !Path::new(SAMPLE_VIDEO).exists() {
        eprintln!("Skipping benchmark: fixture not found");
        return;
    }

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("sample.gif");
    let settings = GifSettings::new().with_frame_count(5).with_target_size(160, 90);

    criterion.bench_function("convert fixture to 5-frame GIF", |bencher| {
        bencher.iter(|| {
            regif::convert(SAMPLE_VIDEO, &path, &settings).unwrap();
        });
    });
}

criterion::criterion_group!(
    benches,
    benchmark_scheduling,
    benchmark_normalization,
    benchmark_gif_assembly,
    benchmark_end_to_end,
);
criterion::criterion_main!(benches);
