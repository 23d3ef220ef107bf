use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use thermgrid::{correlate, detect, trace_contours, RoiRegistry, ThermalGrid};

fn make_grid_fixture(width: u32, height: u32, seed: u64) -> ThermalGrid {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data: Vec<f32> = (0..(width * height) as usize)
        .map(|_| 20.0 + rng.gen_range(-2.0f32..2.0))
        .collect();

    // Warm square blobs the threshold will flag.
    for _ in 0..40 {
        let side = rng.gen_range(2u32..8);
        let x0 = rng.gen_range(0..width - side);
        let y0 = rng.gen_range(0..height - side);
        let value = 90.0 + rng.gen_range(0.0f32..10.0);
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                data[(y * width + x) as usize] = value;
            }
        }
    }

    ThermalGrid::from_raw(width, height, data).expect("fixture dimensions match data")
}

fn bench_detect(c: &mut Criterion) {
    let grid = make_grid_fixture(512, 512, 7);

    c.bench_function("detect_512", |b| {
        b.iter(|| {
            let detection = detect(black_box(&grid), black_box(60.0)).expect("finite threshold");
            black_box(detection.contours.len())
        })
    });
}

fn bench_trace(c: &mut Criterion) {
    let grid = make_grid_fixture(512, 512, 7);
    let mask = detect(&grid, 60.0).expect("finite threshold").mask;

    c.bench_function("trace_contours_512", |b| {
        b.iter(|| {
            let contours = trace_contours(black_box(&mask));
            black_box(contours.len())
        })
    });
}

fn bench_correlate(c: &mut Criterion) {
    let grid = make_grid_fixture(512, 512, 7);
    let detection = detect(&grid, 60.0).expect("finite threshold");
    let mut rois = RoiRegistry::new();
    for i in 0..16u32 {
        let x = (i % 4) * 128;
        let y = (i / 4) * 128;
        rois.define(&format!("tile-{i}"), [x, y], 128, 128, (512, 512))
            .expect("tile fits the grid");
    }

    c.bench_function("correlate_16_rois_512", |b| {
        b.iter(|| {
            let report = correlate(black_box(&detection.mask), black_box(rois.all()));
            black_box(report.results.len())
        })
    });
}

criterion_group!(hotpaths, bench_detect, bench_trace, bench_correlate);
criterion_main!(hotpaths);
