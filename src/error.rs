//! Error types for quire operations.

use thiserror::Error;

/// Errors that can occur while opening or reading an EPUB package.
///
/// `Archive` and `Format` are the fatal stage errors returned from
/// [`EpubContainer::open`](crate::EpubContainer::open). `Item` describes a
/// malformed fragment or an unknown manifest id; parsers log it and carry
/// on.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Invalid EPUB: {0}")]
    Format(String),

    #[error("Invalid item: {0}")]
    Item(String),

    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;
