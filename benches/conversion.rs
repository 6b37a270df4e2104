//! Benchmarks for the HTML to EPUB pipeline.
//!
//! Run with: cargo bench

use std::io::Cursor;

use criterion::{Criterion, criterion_group, criterion_main};

use html_epub::{Book, EpubBuilder, HtmlItem, MemoryLoader, Normalizer, ResourceRoot};

const CHAPTER_HTML: &[u8] = include_bytes!("../tests/fixtures/data/1.html");
const IMAGE_BYTES: &[u8] = include_bytes!("../tests/fixtures/data/images/1.png");
const STYLE_BYTES: &[u8] = include_bytes!("../tests/fixtures/data/styles/epub.css");

const CHAPTERS: usize = 50;

fn root() -> ResourceRoot {
    ResourceRoot::parse("file:///bench/data/").unwrap()
}

fn items() -> Vec<HtmlItem> {
    (0..CHAPTERS).map(|_| HtmlItem::new(CHAPTER_HTML.to_vec())).collect()
}

fn loaded_builder() -> EpubBuilder {
    let root = root();
    let loader = MemoryLoader::new()
        .with(&root.resolve("images/1.png").unwrap(), IMAGE_BYTES.to_vec())
        .with(&root.resolve("styles/epub.css").unwrap(), STYLE_BYTES.to_vec());
    let mut builder = EpubBuilder::new(Book::new("bench", "Bench Book"), root).with_loader(loader);
    builder.load(items()).unwrap();
    builder
}

fn bench_normalize(c: &mut Criterion) {
    let normalizer = Normalizer::new("Bench Book");
    c.bench_function("normalize_chapter", |b| {
        b.iter(|| normalizer.normalize(0, CHAPTER_HTML).unwrap());
    });
}

fn bench_load(c: &mut Criterion) {
    c.bench_function("load_50_chapters", |b| {
        b.iter(|| {
            let mut builder = EpubBuilder::new(Book::new("bench", "Bench Book"), root());
            builder.load(items()).unwrap();
            builder
        });
    });
}

fn bench_write(c: &mut Criterion) {
    let builder = loaded_builder();
    c.bench_function("write_50_chapters", |b| {
        b.iter(|| {
            let mut out = Cursor::new(Vec::new());
            builder.write(&mut out).unwrap();
            out
        });
    });
}

criterion_group!(benches, bench_normalize, bench_load, bench_write);

criterion_main!(benches);
