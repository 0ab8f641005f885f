use criterion::{black_box, criterion_group, criterion_main, Criterion};
use spritehull::{extract, extract_batch, AlphaMask, ExtractionConfig};

/// Star-shaped sprite: concave enough to exercise decomposition.
fn star_mask(size: usize) -> AlphaMask {
    let c = size as f64 / 2.0;
    AlphaMask::from_fn(size, size, |x, y| {
        let dx = x as f64 + 0.5 - c;
        let dy = y as f64 + 0.5 - c;
        let angle = dy.atan2(dx);
        let radius = c * (0.6 + 0.3 * (5.0 * angle).cos());
        if (dx * dx + dy * dy).sqrt() <= radius {
            1.0
        } else {
            0.0
        }
    })
}

fn bench_extract_star(c: &mut Criterion) {
    let mask = star_mask(256);
    let config = ExtractionConfig::default();

    c.bench_function("extract_star_256_default", |b| {
        b.iter(|| {
            let out = extract(black_box(&mask), &config).expect("valid config");
            black_box(out);
        });
    });

    let coarse = config.with_downsample(4);
    c.bench_function("extract_star_256_downsample4", |b| {
        b.iter(|| {
            let out = extract(black_box(&mask), &coarse).expect("valid config");
            black_box(out);
        });
    });
}

fn bench_batch(c: &mut Criterion) {
    let masks: Vec<AlphaMask> = (0..16).map(|i| star_mask(96 + i * 8)).collect();
    let config = ExtractionConfig::default();

    c.bench_function("extract_batch_16_sprites", |b| {
        b.iter(|| {
            let out = extract_batch(black_box(&masks), &config);
            black_box(out);
        });
    });
}

criterion_group!(benches, bench_extract_star, bench_batch);
criterion_main!(benches);
