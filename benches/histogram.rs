use criterion::{Criterion, black_box, criterion_group, criterion_main};
use hsv_histogram::{
    PixelSample, RoundingMode, compute_histogram_32, compute_histogram_32_concurrent,
};
use image::{Rgba, RgbaImage};
use std::sync::Arc;

fn bench_image() -> RgbaImage {
    RgbaImage::from_fn(1280, 960, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8, 255])
    })
}

fn benchmark_conversion(c: &mut Criterion) {
    // #3a648c
    let sample = PixelSample::new(14906, 25700, 35980, 65535);
    c.bench_function("pixel_to_hsv", |b| b.iter(|| black_box(sample).to_hsv()));
}

fn benchmark_histograms(c: &mut Criterion) {
    let img = Arc::new(bench_image());
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");

    c.bench_function("histogram_32_sequential", |b| {
        b.iter(|| compute_histogram_32(black_box(&*img), RoundingMode::Nearest))
    });

    c.bench_function("histogram_32_concurrent", |b| {
        b.iter(|| {
            runtime.block_on(compute_histogram_32_concurrent(
                Arc::clone(&img),
                RoundingMode::Nearest,
            ))
        })
    });
}

criterion_group!(benches, benchmark_conversion, benchmark_histograms);
criterion_main!(benches);
