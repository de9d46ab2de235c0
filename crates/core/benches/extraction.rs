use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use scrivener_core::{CompiledRules, Document, ExtractConfig, extract_from_html, select_content};
use url::Url;

fn bench_parse(c: &mut Criterion) {
    let small = std::fs::read_to_string("../../tests/fixtures/no_article.html").unwrap();
    let medium = std::fs::read_to_string("../../tests/fixtures/blog_post.html").unwrap();

    let mut group = c.benchmark_group("parse");

    group.bench_with_input(BenchmarkId::new("small", "1KB"), &small, |b, html| {
        b.iter(|| Document::parse(black_box(html)))
    });

    group.bench_with_input(BenchmarkId::new("medium", "5KB"), &medium, |b, html| {
        b.iter(|| Document::parse(black_box(html)))
    });

    group.finish();
}

fn bench_full_extraction(c: &mut Criterion) {
    let html = std::fs::read_to_string("../../tests/fixtures/blog_post.html").unwrap();
    let base = Url::parse("https://crumbjournal.com/2024/05/sourdough").unwrap();

    c.bench_function("full_extraction", |b| b.iter(|| extract_from_html(black_box(&html), Some(&base))));
}

fn bench_candidate_selection(c: &mut Criterion) {
    let html = std::fs::read_to_string("../../tests/fixtures/blog_post.html").unwrap();
    let doc = Document::parse(&html);
    let config = ExtractConfig::default();
    let rules = CompiledRules::compile(&config).unwrap();

    c.bench_function("candidate_selection", |b| {
        b.iter(|| select_content(black_box(&doc), None, &rules, &config))
    });
}

criterion_group!(benches, bench_parse, bench_full_extraction, bench_candidate_selection);
criterion_main!(benches);
