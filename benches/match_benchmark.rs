//! Benchmarks for page matching and classification.
//!
//! Run with: cargo bench
//!
//! Pages are synthetic grids of text units with a share of edited lines.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pdfdiff::compare::{compare_documents, compare_pages, CompareOptions, GreedyMatcher, PageMatcher};
use pdfdiff::{BBox, TextUnit};

/// Build a page of `lines` units laid out in two columns.
fn create_page(lines: usize, edit_every: usize) -> Vec<TextUnit> {
    (0..lines)
        .map(|i| {
            let column = (i % 2) as f32;
            let row = (i / 2) as f32;
            let x = 72.0 + column * 250.0;
            let y = 72.0 + row * 14.0;
            let text = if edit_every > 0 && i % edit_every == 0 {
                format!("Line {} of the benchmark page, edited", i)
            } else {
                format!("Line {} of the benchmark page", i)
            };
            TextUnit::new(text, BBox::new(x, y, x + 200.0, y + 12.0), "Helvetica", 10.0)
        })
        .collect()
}

fn bench_compare_pages(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare_pages");
    let options = CompareOptions::default();

    for lines in [10, 50, 200] {
        let original = create_page(lines, 0);
        let modified = create_page(lines, 7);
        group.bench_with_input(BenchmarkId::from_parameter(lines), &lines, |b, _| {
            b.iter(|| compare_pages(black_box(&original), black_box(&modified), &options))
        });
    }

    group.finish();
}

fn bench_matcher(c: &mut Criterion) {
    let original = create_page(200, 0);
    let modified = create_page(200, 3);
    let options = CompareOptions::default().with_similarity_threshold(0.5);

    c.bench_function("greedy_with_completion", |b| {
        let matcher = GreedyMatcher::new();
        b.iter(|| matcher.match_units(black_box(&original), black_box(&modified), &options))
    });

    c.bench_function("greedy_only", |b| {
        let matcher = GreedyMatcher::without_completion();
        b.iter(|| matcher.match_units(black_box(&original), black_box(&modified), &options))
    });
}

fn bench_documents(c: &mut Criterion) {
    let original: Vec<Vec<TextUnit>> = (0..20).map(|_| create_page(100, 0)).collect();
    let modified: Vec<Vec<TextUnit>> = (0..20).map(|_| create_page(100, 5)).collect();

    c.bench_function("compare_documents_sequential", |b| {
        let options = CompareOptions::default();
        b.iter(|| compare_documents(black_box(&original), black_box(&modified), &options))
    });

    c.bench_function("compare_documents_parallel", |b| {
        let options = CompareOptions::default().with_parallel(true);
        b.iter(|| compare_documents(black_box(&original), black_box(&modified), &options))
    });
}

criterion_group!(benches, bench_compare_pages, bench_matcher, bench_documents);
criterion_main!(benches);
