//! Performance benchmarks for outline processing
//!
//! Measures, over a synthetic notebook:
//! - Outline parsing and serialization of a large page body
//! - Building the backlink index across all pages
//! - A full two-phase backlink refresh (in memory and on disk)
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use notaza::{
    backlinks::BacklinkIndex,
    codec::{outline, Page},
    properties::PageId,
    refresh::refresh_backlinks,
    store::{FsPageStore, MemoryPageStore, PageStore},
};
use tempfile::TempDir;

const PAGE_COUNT: usize = 200;

// Each page links the next two pages, one by link and one by hashtag, at varying depths.
fn synthetic_page(n: usize) -> String {
    let mut raw = format!("---\ntitle: Page {n}\n---\n");
    for section in 0..10 {
        raw.push_str(&format!("* section {section} of page {n}\n"));
        raw.push_str(&format!(
            "    * see [next](./page-{}.md)\n        * detail line\n          wrapped\n",
            (n + 1) % PAGE_COUNT
        ));
        raw.push_str(&format!("    * tagged #page-{}\n", (n + 2) % PAGE_COUNT));
        raw.push_str("    * plain text with [[Page 0]] near the end\n");
    }
    raw
}

fn synthetic_notebook() -> Vec<(String, String)> {
    (0..PAGE_COUNT)
        .map(|n| (format!("page-{n}"), synthetic_page(n)))
        .collect()
}

fn large_body() -> String {
    (0..500)
        .map(|n| format!("* item {n}\n    * child of {n}\n        * grandchild #tag{n}\n"))
        .collect()
}

fn bench_parse_outline(c: &mut Criterion) {
    let body = large_body();
    c.bench_function("parse_outline", |b| {
        b.iter(|| outline::parse(black_box(&body)).unwrap().len())
    });
}

fn bench_serialize_outline(c: &mut Criterion) {
    let root = outline::parse(&large_body()).unwrap();
    c.bench_function("serialize_outline", |b| {
        b.iter(|| outline::serialize(black_box(&root)).len())
    });
}

fn bench_build_index(c: &mut Criterion) {
    let pages: Vec<Page> = synthetic_notebook()
        .into_iter()
        .map(|(id, raw)| Page::parse(PageId::from(id), &raw))
        .collect();
    c.bench_function("build_backlink_index", |b| {
        b.iter(|| BacklinkIndex::build(black_box(&pages)).len())
    });
}

fn bench_refresh_in_memory(c: &mut Criterion) {
    c.bench_function("refresh_backlinks_memory", |b| {
        b.iter(|| {
            let store = MemoryPageStore::with_pages(synthetic_notebook());
            refresh_backlinks(&store).unwrap().rewritten.len()
        })
    });
}

fn bench_refresh_on_disk(c: &mut Criterion) {
    c.bench_function("refresh_backlinks_fs", |b| {
        b.iter(|| {
            let tempdir = TempDir::new().unwrap();
            let store = FsPageStore::new(tempdir.path(), "md");
            for (id, raw) in synthetic_notebook() {
                store.save(&PageId::from(id), &raw).unwrap();
            }
            refresh_backlinks(&store).unwrap().rewritten.len()
        })
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(50)  // Fewer samples for file I/O benchmarks
        .measurement_time(std::time::Duration::from_secs(10));
    targets =
        bench_parse_outline,
        bench_serialize_outline,
        bench_build_index,
        bench_refresh_in_memory,
        bench_refresh_on_disk
}

criterion_main!(benches);
