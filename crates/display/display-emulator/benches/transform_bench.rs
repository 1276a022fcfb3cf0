//! Criterion benchmarks for the frame pipeline.
//!
//! Run: cargo bench -p display-emulator --features headless --bench transform_bench
//!
//! Results show:
//!   palette_index_*: raw colour-cube mapping vs the memoized cache
//!   transform/*: each named transform on a 128×64 frame
//!   render_pipeline: preprocess + blend + scale2x, as every backend runs it

#![allow(
    clippy::unwrap_used, // benchmark helpers use unwrap for brevity
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation, // pixel coordinates are < 256
    missing_docs,        // criterion_group! macro generates undocumented items
)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use display_emulator::{rgb_to_palette_index, ColorCube, Emulator, EmulatorConfig, Transform, Transformer};
use image::{DynamicImage, Rgb, RgbImage};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A frame with gradients and hard edges, like typical UI content
fn test_frame(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        if (x / 8 + y / 8) % 2 == 0 {
            Rgb([(x * 2) as u8, (y * 4) as u8, 128])
        } else {
            Rgb([0, 0, 0])
        }
    })
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_palette_index(c: &mut Criterion) {
    let frame = test_frame(128, 64);

    c.bench_function("palette_index_uncached", |b| {
        b.iter(|| {
            for pixel in frame.pixels() {
                let [r, g, bl] = pixel.0;
                black_box(rgb_to_palette_index(r, g, bl));
            }
        });
    });

    c.bench_function("palette_index_cached", |b| {
        let mut cube = ColorCube::new();
        b.iter(|| {
            for pixel in frame.pixels() {
                black_box(cube.index_of(*pixel));
            }
        });
    });
}

fn bench_transforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");
    let frame = test_frame(128, 64);
    let tf = Transformer::new(128, 64, 2).unwrap();

    for transform in Transform::ALL {
        group.bench_with_input(
            BenchmarkId::from_parameter(transform),
            &transform,
            |b, &transform| {
                b.iter(|| black_box(tf.apply(transform, frame.clone()).unwrap()));
            },
        );
    }
    group.finish();
}

fn bench_render_pipeline(c: &mut Criterion) {
    let mut emulator = Emulator::new(EmulatorConfig::DEFAULT).unwrap();
    emulator.set_contrast(0x80);
    let image = DynamicImage::ImageRgb8(test_frame(128, 64));

    c.bench_function("render_pipeline", |b| {
        b.iter(|| black_box(emulator.render(&image).unwrap()));
    });
}

criterion_group!(benches, bench_palette_index, bench_transforms, bench_render_pipeline);
criterion_main!(benches);
