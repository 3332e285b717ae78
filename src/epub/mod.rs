//! EPUB package parsing (container.xml, OPF, NCX) and the container that
//! drives it.

pub mod container;
pub mod ncx;
pub mod package;
mod reader;
pub mod xml;

pub use reader::{EpubContainer, ReadSeek, State};

/// Entry holding the package media type.
pub const MIMETYPE_FILE: &str = "mimetype";

/// Expected content of [`MIMETYPE_FILE`].
pub const EPUB_MIMETYPE: &str = "application/epub+zip";

/// Entry listing the package documents.
pub const CONTAINER_FILE: &str = "META-INF/container.xml";

/// Fixed name of the legacy NCX table of contents.
pub const TOC_FILE: &str = "toc.ncx";
