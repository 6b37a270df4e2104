//! End-to-end conversions of the fixture book.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use url::Url;
use zip::{CompressionMethod, ZipArchive};

use html_epub::{Book, EpubBuilder, EpubConfig, Error, HtmlItem, MemoryLoader, ResourceRoot};

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/data")
}

fn fixture(name: &str) -> HtmlItem {
    HtmlItem::new(std::fs::read(data_dir().join(name)).expect("fixture exists"))
}

fn test_book() -> Book {
    Book::new("com.example/1", "Test Book")
        .with_updated(Utc.with_ymd_and_hms(2017, 1, 1, 0, 0, 0).unwrap())
}

fn fixture_builder() -> EpubBuilder {
    let root = ResourceRoot::from_dir(data_dir()).unwrap();
    let mut builder = EpubBuilder::new(test_book(), root);
    builder.load(vec![fixture("1.html"), fixture("2.html")]).unwrap();
    builder
}

fn write_to_memory(builder: &EpubBuilder) -> ZipArchive<Cursor<Vec<u8>>> {
    let mut out = Cursor::new(Vec::new());
    builder.write(&mut out).unwrap();
    ZipArchive::new(Cursor::new(out.into_inner())).unwrap()
}

fn entry_names<R: Read + std::io::Seek>(archive: &mut ZipArchive<R>) -> Vec<String> {
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

fn read_entry<R: Read + std::io::Seek>(archive: &mut ZipArchive<R>, name: &str) -> String {
    let mut content = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    content
}

#[test]
fn test_two_documents_without_resources() {
    let root = ResourceRoot::parse("file:///books/data/").unwrap();
    let mut builder = EpubBuilder::new(test_book(), root);
    builder
        .load(vec![
            HtmlItem::new(b"<h1>One</h1><p>First</p>".to_vec()),
            HtmlItem::new(b"<h1>Two</h1><p>Second</p>".to_vec()),
        ])
        .unwrap();

    let mut archive = write_to_memory(&builder);
    assert_eq!(
        entry_names(&mut archive),
        [
            "mimetype",
            "META-INF/container.xml",
            "EPUB/package.opf",
            "EPUB/toc.xhtml",
            "EPUB/xhtml/chapter-1.xhtml",
            "EPUB/xhtml/chapter-2.xhtml",
        ]
    );

    let mimetype = archive.by_index(0).unwrap();
    assert_eq!(mimetype.compression(), CompressionMethod::Stored);
    drop(mimetype);
    assert_eq!(read_entry(&mut archive, "mimetype"), "application/epub+zip");

    let container = read_entry(&mut archive, "META-INF/container.xml");
    assert!(container.contains(r#"full-path="EPUB/package.opf""#));
}

#[test]
fn test_fixture_book_loads_in_order() {
    let builder = fixture_builder();

    let documents = builder.documents();
    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0].id, "chapter-1");
    assert_eq!(documents[0].title, "Chapter 1");
    assert_eq!(documents[1].id, "chapter-2");
    assert_eq!(documents[1].title, "Chapter 2");

    let dom = &documents[0].dom;
    assert_eq!(dom.text_of(dom.find_by_tag("h2").unwrap()), "Test Section");
    assert_eq!(dom.text_of(dom.find_by_tag("title").unwrap()), "Test Book");
}

#[test]
fn test_fixture_resources_extracted() {
    let builder = fixture_builder();
    let root = builder.root().as_str().to_string();
    assert!(root.ends_with("/data/"));

    let image = builder.images().next().expect("image extracted");
    assert_eq!(image.source.as_str(), format!("{root}images/1.png"));
    assert_eq!(image.target, "images/image-1-0.png");
    assert_eq!(image.media_type, "image/png");

    let style = builder.styles().next().expect("stylesheet extracted");
    assert_eq!(style.source.as_str(), format!("{root}styles/epub.css"));
    assert_eq!(style.target, "styles/style-1-0.css");
    assert_eq!(style.media_type, "text/css");
}

#[test]
fn test_fixture_archive() {
    let builder = fixture_builder();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.epub");
    builder.write_epub_file(&path).unwrap();

    let mut archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
    assert_eq!(
        entry_names(&mut archive),
        [
            "mimetype",
            "META-INF/container.xml",
            "EPUB/package.opf",
            "EPUB/toc.xhtml",
            "EPUB/xhtml/chapter-1.xhtml",
            "EPUB/xhtml/chapter-2.xhtml",
            "EPUB/styles/style-1-0.css",
            "EPUB/images/image-1-0.png",
        ]
    );

    let opf = read_entry(&mut archive, "EPUB/package.opf");
    assert!(opf.contains(r#"<dc:title id="title">Test Book</dc:title>"#));
    assert!(opf.contains(
        r#"<item id="chapter-1" href="xhtml/chapter-1.xhtml" media-type="application/xhtml+xml" properties="scripted mathml svg"/>"#
    ));
    assert!(opf.contains(
        r#"<item id="chapter-2" href="xhtml/chapter-2.xhtml" media-type="application/xhtml+xml"/>"#
    ));
    assert!(opf.contains(
        r#"<item id="image-1-0" href="images/image-1-0.png" media-type="image/png"/>"#
    ));
    assert!(opf.contains(
        r#"<item id="style-1-0" href="styles/style-1-0.css" media-type="text/css"/>"#
    ));

    let nav = read_entry(&mut archive, "EPUB/toc.xhtml");
    assert!(nav.contains(r#"<a href="xhtml/chapter-1.xhtml">Chapter 1</a>"#));
    assert!(nav.contains(r#"<a href="xhtml/chapter-2.xhtml">Chapter 2</a>"#));

    let chapter = read_entry(&mut archive, "EPUB/xhtml/chapter-1.xhtml");
    assert!(chapter.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(chapter.contains(r#"src="../images/image-1-0.png""#));
    assert!(chapter.contains(r#"href="../styles/style-1-0.css""#));

    let mut png = Vec::new();
    archive
        .by_name("EPUB/images/image-1-0.png")
        .unwrap()
        .read_to_end(&mut png)
        .unwrap();
    assert_eq!(png, std::fs::read(data_dir().join("images/1.png")).unwrap());
}

#[test]
fn test_rewritten_references_resolve_to_archive_paths() {
    let builder = fixture_builder();
    let base = Url::parse("http://archive/").unwrap();

    let mut referenced = BTreeSet::new();
    for doc in builder.documents() {
        let location = base.join(&format!("EPUB/{}", doc.target)).unwrap();
        let dom = &doc.dom;
        let refs = dom
            .find_all_by_tag("img")
            .into_iter()
            .filter_map(|id| dom.get_attr(id, "src"))
            .chain(
                dom.find_all_by_tag("link")
                    .into_iter()
                    .filter_map(|id| dom.get_attr(id, "href")),
            );
        for reference in refs {
            referenced.insert(location.join(reference).unwrap().path().to_string());
        }
    }

    let recorded: BTreeSet<_> = builder
        .resources()
        .iter()
        .map(|r| format!("/EPUB/{}", r.target))
        .collect();
    assert_eq!(referenced, recorded);
}

#[test]
fn test_escaping_reference_rejected_before_writing() {
    let root = ResourceRoot::from_dir(data_dir()).unwrap();
    let mut builder = EpubBuilder::new(test_book(), root);
    builder.load(vec![fixture("2.html")]).unwrap();

    let err = builder
        .load(vec![HtmlItem::new(
            b"<p><img src=\"images/1.png\"><img src=\"../../etc/passwd\"></p>".to_vec(),
        )])
        .unwrap_err();

    match err {
        Error::SecurityViolation {
            document,
            reference,
            resolved,
        } => {
            assert_eq!(document, "chapter-2");
            assert_eq!(reference, "../../etc/passwd");
            assert!(!resolved.starts_with(builder.root().as_str()));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(builder.documents().len(), 1);
    assert!(builder.resources().is_empty());
}

#[test]
fn test_absolute_urls_rejected() {
    let root = ResourceRoot::parse("https://example.com/data").unwrap();
    let mut builder = EpubBuilder::new(test_book(), root);

    let err = builder
        .load(vec![HtmlItem::new(
            b"<img src=\"https://evil.example/x.png\">".to_vec(),
        )])
        .unwrap_err();
    assert!(matches!(err, Error::SecurityViolation { .. }));

    // A sibling directory sharing the root's prefix is outside too
    let err = builder
        .load(vec![HtmlItem::new(b"<img src=\"../database/x.png\">".to_vec())])
        .unwrap_err();
    assert!(matches!(err, Error::SecurityViolation { .. }));
}

#[test]
fn test_modified_defaults_to_whole_second_utc() {
    let root = ResourceRoot::parse("file:///books/data/").unwrap();
    let mut builder = EpubBuilder::new(Book::new("com.example/1", "Test Book"), root);
    builder.load(vec![HtmlItem::new(b"<p>x</p>".to_vec())]).unwrap();

    let mut archive = write_to_memory(&builder);
    let opf = read_entry(&mut archive, "EPUB/package.opf");

    let start = opf
        .find(r#"<meta property="dcterms:modified">"#)
        .expect("modified meta present")
        + r#"<meta property="dcterms:modified">"#.len();
    let value = &opf[start..start + opf[start..].find('<').unwrap()];

    assert!(value.ends_with('Z'), "{value}");
    assert!(!value.contains('.'), "{value}");
    assert!(DateTime::parse_from_rfc3339(value).is_ok(), "{value}");
}

#[test]
fn test_duplicate_references_not_deduplicated() {
    let root = ResourceRoot::parse("file:///books/data/").unwrap();
    let png = root.resolve("images/1.png").unwrap();
    let mut builder = EpubBuilder::new(test_book(), root)
        .with_loader(MemoryLoader::new().with(&png, b"png".to_vec()));
    builder
        .load(vec![HtmlItem::new(
            b"<img src=\"images/1.png\"><img src=\"/images/1.png\">".to_vec(),
        )])
        .unwrap();

    let targets: Vec<_> = builder.images().map(|r| r.target.as_str()).collect();
    assert_eq!(targets, ["images/image-1-0.png", "images/image-1-1.png"]);
    assert!(builder.images().all(|r| r.source == png));

    let mut archive = write_to_memory(&builder);
    assert_eq!(read_entry(&mut archive, "EPUB/images/image-1-1.png"), "png");
}

#[test]
fn test_missing_resource_fails_archive() {
    let root = ResourceRoot::from_dir(data_dir()).unwrap();
    let mut builder = EpubBuilder::new(test_book(), root);
    builder
        .load(vec![HtmlItem::new(b"<img src=\"images/missing.png\">".to_vec())])
        .unwrap();

    let err = builder.write(Cursor::new(Vec::new())).unwrap_err();
    assert!(matches!(err, Error::ResourceRead { ref id, .. } if id == "image-1-0"));
}

#[test]
fn test_non_linear_nav_with_custom_level() {
    let root = ResourceRoot::parse("file:///books/data/").unwrap();
    let config = EpubConfig {
        compression_level: Some(1),
        nav_linear: false,
    };
    let mut builder = EpubBuilder::new(test_book(), root).with_config(config);
    builder.load(vec![HtmlItem::new(b"<p>x</p>".to_vec())]).unwrap();

    let mut archive = write_to_memory(&builder);
    let opf = read_entry(&mut archive, "EPUB/package.opf");
    assert!(opf.contains(r#"<itemref idref="toc" linear="no"/>"#));
    assert!(opf.contains(r#"<itemref idref="chapter-1"/>"#));
}

#[test]
fn test_encoded_separator_cannot_leave_root() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    std::fs::create_dir(&data).unwrap();
    std::fs::write(dir.path().join("secret.txt"), "TOPSECRET\n").unwrap();

    let root = ResourceRoot::from_dir(&data).unwrap();
    let mut builder = EpubBuilder::new(test_book(), root);

    for src in ["..%2fsecret.txt", "..%2Fsecret.txt", "..%5csecret.txt"] {
        let html = format!("<img src=\"{src}\">");
        let err = builder.load(vec![HtmlItem::new(html.into_bytes())]).unwrap_err();
        assert!(matches!(err, Error::SecurityViolation { .. }), "{src}: {err}");
    }
    assert!(builder.documents().is_empty());
    assert!(builder.resources().is_empty());
}
