//! Benchmarks for the section selection scans.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_precision_loss)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use scrollspy::locator::{ActiveSectionLocator, RecordingMarker};
use scrollspy::{NavEntry, SectionRect};

fn entries(count: usize) -> Vec<NavEntry> {
    (0..count)
        .map(|i| NavEntry::new(format!("nav-{i}"), format!("section-{i}")))
        .collect()
}

/// Sections stacked 800px apart, scrolled `offset` px down the page.
fn rects(count: usize, offset: f64) -> Vec<SectionRect> {
    (0..count)
        .map(|i| {
            let top = i as f64 * 800.0 - offset;
            SectionRect::new(format!("section-{i}"), top, top + 800.0)
        })
        .collect()
}

/// Distance scan over one scroll frame
fn bench_scroll_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroll_frame");
    for count in [6usize, 24, 96] {
        let frame = rects(count, 1234.0);
        group.bench_with_input(BenchmarkId::from_parameter(count), &frame, |b, frame| {
            let mut locator = ActiveSectionLocator::from_entries(entries(count));
            let mut marker = RecordingMarker::new();
            b.iter(|| locator.apply_scroll(black_box(frame), black_box(64.0), &mut marker));
        });
    }
    group.finish();
}

/// Ratio scan after a two-entry visibility batch
fn bench_visibility_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("visibility_batch");
    for count in [6usize, 24, 96] {
        group.bench_function(BenchmarkId::from_parameter(count), |b| {
            let mut locator = ActiveSectionLocator::from_entries(entries(count));
            let mut marker = RecordingMarker::new();
            let mut flip = false;
            b.iter(|| {
                flip = !flip;
                let (a, b_ratio) = if flip { (0.75, 0.25) } else { (0.25, 0.75) };
                locator.apply_visibility(
                    black_box([("section-1", a), ("section-2", b_ratio)]),
                    &mut marker,
                )
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scroll_frame, bench_visibility_batch);
criterion_main!(benches);
