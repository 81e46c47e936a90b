//! Performance benchmarks for PDF Reader MCP Server
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pdf_reader_mcp::pdf::{normalize, PdfReader};
use pdf_reader_mcp::text::{clean_text, search_text, SearchOptions};

#[path = "../tests/common/mod.rs"]
mod common;

use common::{build_pdf, FixtureSpec};

fn page_body(page: usize) -> String {
    (1..=40)
        .map(|line| {
            format!(
                "Page {} line {}: the quick brown fox jumps over the lazy dog",
                page, line
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn generated_pdf(pages: usize) -> Vec<u8> {
    let bodies: Vec<String> = (1..=pages).map(page_body).collect();
    build_pdf(&FixtureSpec {
        pages: bodies.iter().map(String::as_str).collect(),
        title: Some("Benchmark"),
        author: Some("criterion"),
        keywords: None,
    })
}

/// Benchmark full parse plus text extraction
fn bench_text_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_extraction");

    for pages in [1, 10, 50] {
        let data = generated_pdf(pages);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("open_bytes", format!("{}_pages", pages)),
            &data,
            |b, data| {
                b.iter(|| {
                    let reader = PdfReader::open_bytes(black_box(data)).unwrap();
                    let _ = reader.full_text();
                });
            },
        );
    }

    group.finish();
}

/// Metadata-only loads skip content streams
fn bench_metadata_extraction(c: &mut Criterion) {
    let data = generated_pdf(50);

    c.bench_function("metadata_extraction", |b| {
        b.iter(|| {
            let reader = PdfReader::open_bytes_metadata_only(black_box(&data)).unwrap();
            let _ = normalize(reader.metadata());
            let _ = reader.page_count();
        });
    });
}

fn bench_clean_text(c: &mut Criterion) {
    let text = (1..=50)
        .map(|page| page_body(page).replace(' ', "   "))
        .collect::<Vec<_>>()
        .join("\n\n");

    c.bench_function("clean_text_50_pages", |b| {
        b.iter(|| clean_text(black_box(&text)));
    });
}

fn bench_search(c: &mut Criterion) {
    let text = (1..=50).map(page_body).collect::<Vec<_>>().join("\n");

    let mut group = c.benchmark_group("search");

    group.bench_function("case_insensitive", |b| {
        b.iter(|| search_text(black_box(&text), black_box("Fox"), SearchOptions::default()));
    });

    group.bench_function("case_sensitive", |b| {
        let options = SearchOptions {
            case_sensitive: true,
            whole_word: false,
        };
        b.iter(|| search_text(black_box(&text), black_box("fox"), options));
    });

    group.bench_function("whole_word", |b| {
        let options = SearchOptions {
            case_sensitive: false,
            whole_word: true,
        };
        b.iter(|| search_text(black_box(&text), black_box("dog"), options));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_text_extraction,
    bench_metadata_extraction,
    bench_clean_text,
    bench_search,
);

criterion_main!(benches);
