//! ZIP container access.
//!
//! [`Archive`] knows nothing about EPUB. It lists entry names and reads
//! entries by name, owning the underlying reader for its whole lifetime.

use std::io::{Cursor, Read, Seek};

use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{Error, Result};

/// An opened ZIP archive.
pub struct Archive<R> {
    zip: ZipArchive<R>,
}

impl Archive<Cursor<Vec<u8>>> {
    /// Open an archive held in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::new(Cursor::new(data))
    }
}

impl<R: Read + Seek> Archive<R> {
    /// Open an archive from any [`Read`] + [`Seek`] source.
    pub fn new(reader: R) -> Result<Self> {
        let zip = ZipArchive::new(reader)
            .map_err(|e| Error::Archive(format!("Not a ZIP container: {e}")))?;
        Ok(Self { zip })
    }

    /// Number of entries in the archive.
    pub fn len(&self) -> usize {
        self.zip.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zip.is_empty()
    }

    /// All entry names, in central-directory order.
    pub fn entries(&self) -> Vec<String> {
        self.zip.file_names().map(str::to_string).collect()
    }

    /// True when an entry with exactly this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.zip.index_for_name(name).is_some()
    }

    /// Read an entry to the end.
    ///
    /// When `name` is not found, retries with the percent-decoded name, since
    /// some packages reference `My%20Chapter.xhtml` for an entry stored as
    /// `My Chapter.xhtml`.
    pub fn read(&mut self, name: &str) -> Result<Vec<u8>> {
        match self.read_exact_name(name) {
            Err(Error::Zip(ZipError::FileNotFound)) => {}
            other => return other,
        }

        let decoded = percent_encoding::percent_decode_str(name)
            .decode_utf8()
            .map_err(|_| Error::Archive(format!("Invalid UTF-8 in path: {name}")))?;
        if decoded != name {
            match self.read_exact_name(&decoded) {
                Err(Error::Zip(ZipError::FileNotFound)) => {}
                other => return other,
            }
        }

        Err(Error::Archive(format!("No entry named {name}")))
    }

    fn read_exact_name(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut file = self.zip.by_name(name)?;
        // The declared size comes from the header and can't be trusted.
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;
        Ok(contents)
    }
}
