//! Benchmarks for package parsing.
//!
//! Run with: cargo bench

use std::io::{Cursor, Write};

use criterion::{Criterion, criterion_group, criterion_main};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use quire::EpubContainer;
use quire::epub::ncx::parse_ncx;
use quire::epub::package::parse_package;

const CHAPTERS: usize = 200;

fn content_opf() -> String {
    let mut manifest = String::new();
    let mut spine = String::new();
    for i in 0..CHAPTERS {
        manifest.push_str(&format!(
            "<item id=\"ch{i}\" href=\"text/ch{i}.xhtml\" media-type=\"application/xhtml+xml\"/>\n"
        ));
        spine.push_str(&format!("<itemref idref=\"ch{i}\"/>\n"));
    }
    format!(
        r#"<?xml version="1.0"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0">
<metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
<dc:title>Benchmark</dc:title><dc:creator>One</dc:creator><dc:creator>Two</dc:creator>
</metadata>
<manifest>{manifest}</manifest>
<spine>{spine}</spine>
</package>"#
    )
}

fn toc_ncx() -> String {
    let mut nav_points = String::new();
    for i in 0..CHAPTERS {
        nav_points.push_str(&format!(
            "<navPoint id=\"np{i}\" playOrder=\"{}\"><navLabel><text>Chapter {i}</text></navLabel><content src=\"text/ch{i}.xhtml\"/></navPoint>\n",
            i + 1
        ));
    }
    format!("<ncx version=\"2005-1\"><navMap>{nav_points}</navMap></ncx>")
}

fn epub_bytes() -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    let container = r#"<container><rootfiles><rootfile full-path="OEBPS/content.opf"/></rootfiles></container>"#;

    let entries = [
        ("mimetype".to_string(), "application/epub+zip".to_string()),
        ("META-INF/container.xml".to_string(), container.to_string()),
        ("OEBPS/content.opf".to_string(), content_opf()),
        ("toc.ncx".to_string(), toc_ncx()),
    ];
    for (name, data) in entries {
        zip.start_file(name, options).unwrap();
        zip.write_all(data.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

fn bench_parse_package(c: &mut Criterion) {
    let opf = content_opf();
    c.bench_function("parse_package", |b| {
        b.iter(|| parse_package(&opf, "OEBPS/content.opf").unwrap());
    });
}

fn bench_parse_ncx(c: &mut Criterion) {
    let ncx = toc_ncx();
    c.bench_function("parse_ncx", |b| {
        b.iter(|| parse_ncx(&ncx).unwrap());
    });
}

fn bench_open(c: &mut Criterion) {
    let data = epub_bytes();
    c.bench_function("open_epub", |b| {
        b.iter(|| {
            let mut container = EpubContainer::new();
            container.open_bytes(data.clone()).unwrap();
            container
        });
    });
}

criterion_group!(benches, bench_parse_package, bench_parse_ncx, bench_open);
criterion_main!(benches);
