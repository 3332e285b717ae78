//! Shared fixtures: EPUB archives assembled in memory.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const MIMETYPE: &str = "application/epub+zip";

pub const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

pub const CONTENT_OPF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0" unique-identifier="bookid">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
    <dc:title>The Short Works</dc:title>
    <dc:creator opf:role="aut">A</dc:creator>
    <dc:creator opf:role="trl">B</dc:creator>
    <dc:language>en</dc:language>
    <dc:identifier id="bookid" opf:scheme="UUID">urn:uuid:0f3a</dc:identifier>
    <dc:date opf:event="publication">1900</dc:date>
    <meta name="cover" content="cover-image"/>
  </metadata>
  <manifest>
    <item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
    <item id="css" href="css/style.css" media-type="text/css"/>
    <item id="cover-image" href="images/cover.png" media-type="image/png"/>
    <item id="cover" href="text/cover.xhtml" media-type="application/xhtml+xml"/>
    <item id="chap1" href="chap1.xhtml" media-type="application/xhtml+xml"/>
    <item id="chap2" href="text/chap2.xhtml" media-type="application/xhtml+xml"/>
    <item id="appendix" href="text/appendix.xhtml" media-type="application/xhtml+xml"/>
  </manifest>
  <spine toc="ncx">
    <itemref idref="cover" linear="no"/>
    <itemref idref="chap1"/>
    <itemref idref="chap2"/>
    <itemref idref="ghost"/>
  </spine>
  <guide>
    <reference type="cover" title="Cover" href="text/cover.xhtml"/>
    <reference type="text" title="Beginning" href="chap1.xhtml"/>
    <reference type="other.backmatter" title="Back Matter" href="text/appendix.xhtml"/>
  </guide>
</package>"#;

pub const TOC_NCX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1" xml:lang="en">
  <head>
    <meta name="dtb:uid" content="urn:uuid:0f3a"/>
    <meta name="dtb:depth" content="1"/>
  </head>
  <docTitle><text>The Short Works</text></docTitle>
  <navMap>
    <navPoint id="np-2" playOrder="2" class="chapter">
      <navLabel><text>Chapter Two</text></navLabel>
      <content src="text/chap2.xhtml"/>
    </navPoint>
    <navPoint id="np-1" playOrder="1" class="chapter">
      <navLabel><text>Chapter One</text></navLabel>
      <content src="chap1.xhtml"/>
    </navPoint>
  </navMap>
</ncx>"#;

pub const CHAPTER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml"><head><title>Chapter</title></head>
<body><p>Text.</p></body></html>"#;

/// Builds an EPUB archive entry by entry.
#[derive(Default)]
pub struct EpubBuilder {
    entries: Vec<(String, Vec<u8>)>,
}

impl EpubBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A complete, valid package with the NCX at the archive root.
    pub fn standard() -> Self {
        Self::new()
            .entry("mimetype", MIMETYPE)
            .entry("META-INF/container.xml", CONTAINER_XML)
            .entry("OEBPS/content.opf", CONTENT_OPF)
            .entry("OEBPS/text/cover.xhtml", CHAPTER)
            .entry("OEBPS/chap1.xhtml", CHAPTER)
            .entry("OEBPS/text/chap2.xhtml", CHAPTER)
            .entry("OEBPS/text/appendix.xhtml", CHAPTER)
            .entry("OEBPS/css/style.css", "p { margin: 0 }")
            .entry("toc.ncx", TOC_NCX)
    }

    pub fn entry(mut self, name: &str, data: impl AsRef<[u8]>) -> Self {
        self.entries.push((name.to_string(), data.as_ref().to_vec()));
        self
    }

    /// Drop any entry with this name.
    pub fn without(mut self, name: &str) -> Self {
        self.entries.retain(|(n, _)| n != name);
        self
    }

    /// Replace (or add) an entry.
    pub fn replace(self, name: &str, data: impl AsRef<[u8]>) -> Self {
        self.without(name).entry(name, data)
    }

    pub fn build(&self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, data) in &self.entries {
            let options = if name == "mimetype" { stored } else { deflated };
            zip.start_file(name.as_str(), options)
                .expect("Failed to start zip entry");
            zip.write_all(data).expect("Failed to write zip entry");
        }

        zip.finish().expect("Failed to finish zip").into_inner()
    }
}
