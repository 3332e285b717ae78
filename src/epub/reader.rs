//! The EPUB container: drives parsing and owns the archive afterwards.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::archive::Archive;
use crate::epub::container::parse_container_xml;
use crate::epub::ncx::parse_ncx;
use crate::epub::package::{PackageDocument, parse_package};
use crate::epub::{CONTAINER_FILE, EPUB_MIMETYPE, MIMETYPE_FILE, TOC_FILE};
use crate::error::{Error, Result};
use crate::model::{Item, ItemRegistry, Metadata, ReferenceRegistry, TableOfContents};
use crate::util::{clean_path, decode_xml};

/// Any seekable byte source the container can own.
pub trait ReadSeek: Read + Seek + Send {}

impl<T: Read + Seek + Send> ReadSeek for T {}

type BoxedArchive = Archive<Box<dyn ReadSeek>>;

/// Progress of [`EpubContainer::open`]. Each state is reached only after the
/// previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Unopened,
    MimetypeValidated,
    ContainerLocated,
    PackageParsed,
    TocParsed,
    Ready,
    Failed,
}

/// An opened EPUB package.
///
/// Built by one [`open`](Self::open) call and left unchanged afterwards,
/// apart from [`set_metadata`](Self::set_metadata). After a failed open the
/// model may be partially filled and should be discarded.
///
/// # Example
///
/// ```no_run
/// use quire::EpubContainer;
///
/// let mut container = EpubContainer::new();
/// container.open("book.epub")?;
/// println!("Title: {}", container.metadata("title"));
/// for item in container.items().ordered_items() {
///     println!("{}", item.path);
/// }
/// # Ok::<(), quire::Error>(())
/// ```
pub struct EpubContainer {
    archive: Option<BoxedArchive>,
    path: Option<PathBuf>,
    package_path: Option<String>,
    state: State,
    metadata: Metadata,
    items: ItemRegistry,
    references: ReferenceRegistry,
    toc: TableOfContents,
    ncx_id: Option<String>,
    errors: Vec<String>,
}

impl Default for EpubContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EpubContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EpubContainer")
            .field("path", &self.path)
            .field("package_path", &self.package_path)
            .field("state", &self.state)
            .field("items", &self.items.len())
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

impl EpubContainer {
    pub fn new() -> Self {
        Self {
            archive: None,
            path: None,
            package_path: None,
            state: State::Unopened,
            metadata: Metadata::default(),
            items: ItemRegistry::default(),
            references: ReferenceRegistry::default(),
            toc: TableOfContents::default(),
            ncx_id: None,
            errors: Vec::new(),
        }
    }

    /// Open the EPUB file at `path`.
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.reset();
        self.path = Some(path.to_path_buf());

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                return self.fail(Error::Archive(format!(
                    "Failed to open {}: {e}",
                    path.display()
                )));
            }
        };
        self.open_archive(Box::new(BufReader::new(file)))
    }

    /// Open an EPUB from any [`Read`] + [`Seek`] source.
    pub fn open_reader<R: Read + Seek + Send + 'static>(&mut self, reader: R) -> Result<()> {
        self.reset();
        self.open_archive(Box::new(reader))
    }

    /// Open an EPUB held in memory.
    pub fn open_bytes(&mut self, data: Vec<u8>) -> Result<()> {
        self.open_reader(Cursor::new(data))
    }

    fn open_archive(&mut self, reader: Box<dyn ReadSeek>) -> Result<()> {
        let archive = match Archive::new(reader) {
            Ok(archive) => archive,
            Err(e) => return self.fail(e),
        };
        if archive.is_empty() {
            return self.fail(Error::Archive("Failed to read an empty archive".into()));
        }
        self.archive = Some(archive);

        match self.run_pipeline() {
            Ok(()) => {
                self.state = State::Ready;
                debug!(
                    "Opened package {:?}: {} items, {} in spine",
                    self.package_path,
                    self.items.len(),
                    self.items.ordered_ids().len()
                );
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    fn run_pipeline(&mut self) -> Result<()> {
        self.parse_mimetype()?;
        self.state = State::MimetypeValidated;

        let candidates = self.parse_container()?;
        self.state = State::ContainerLocated;

        self.parse_package_candidates(&candidates)?;
        self.state = State::PackageParsed;

        self.parse_toc()?;
        self.state = State::TocParsed;

        Ok(())
    }

    fn parse_mimetype(&mut self) -> Result<()> {
        let archive = self.archive_mut()?;
        if !archive.contains(MIMETYPE_FILE) {
            return Err(Error::Format("Unable to find mimetype in file".into()));
        }

        let mimetype = archive.read(MIMETYPE_FILE)?;
        if mimetype != EPUB_MIMETYPE.as_bytes() {
            warn!("Unexpected mimetype {}", String::from_utf8_lossy(&mimetype));
        }
        Ok(())
    }

    fn parse_container(&mut self) -> Result<Vec<String>> {
        let archive = self.archive_mut()?;
        if !archive.contains(CONTAINER_FILE) {
            return Err(Error::Format("Unable to find container information".into()));
        }

        let bytes = archive.read(CONTAINER_FILE)?;
        match parse_container_xml(&decode_xml(&bytes)) {
            Ok(candidates) => Ok(candidates),
            Err(e) => {
                warn!("Malformed {CONTAINER_FILE}: {e}");
                Ok(Vec::new())
            }
        }
    }

    fn parse_package_candidates(&mut self, candidates: &[String]) -> Result<()> {
        for candidate in candidates {
            let package_path = clean_path(candidate.trim_start_matches('/'));
            if package_path.is_empty() {
                warn!("Invalid root file entry {candidate:?}");
                continue;
            }

            match self.parse_package_file(&package_path) {
                Ok(package) => {
                    self.commit_package(package_path, package);
                    return Ok(());
                }
                Err(e) => warn!("Unusable package document {package_path}: {e}"),
            }
        }

        Err(Error::Format(
            "Unable to find and use any content files".into(),
        ))
    }

    fn parse_package_file(&mut self, package_path: &str) -> Result<PackageDocument> {
        let bytes = self.archive_mut()?.read(package_path)?;
        parse_package(&decode_xml(&bytes), package_path)
    }

    fn commit_package(&mut self, package_path: String, package: PackageDocument) {
        debug!("Using package document {package_path}");
        self.package_path = Some(package_path);
        self.metadata = package.metadata;
        self.items = package.items;
        self.references = package.references;
        self.ncx_id = package.ncx_id;
    }

    fn parse_toc(&mut self) -> Result<()> {
        let Some(toc_path) = self.toc_path() else {
            debug!("No {TOC_FILE} in package, table of contents left empty");
            return Ok(());
        };

        let bytes = self.archive_mut()?.read(&toc_path)?;
        match parse_ncx(&decode_xml(&bytes)) {
            Ok(toc) => self.toc = toc,
            Err(e) => warn!("Malformed table of contents {toc_path}: {e}"),
        }
        Ok(())
    }

    /// The fixed root NCX entry, else the item named by the spine's `toc`.
    fn toc_path(&self) -> Option<String> {
        let archive = self.archive.as_ref()?;
        if archive.contains(TOC_FILE) {
            return Some(TOC_FILE.to_string());
        }

        self.ncx_id
            .as_deref()
            .and_then(|id| self.items.get(id))
            .map(|item| item.path.clone())
            .filter(|path| archive.contains(path))
    }

    fn archive_mut(&mut self) -> Result<&mut BoxedArchive> {
        self.archive
            .as_mut()
            .ok_or_else(|| Error::Archive("No package is open".into()))
    }

    fn fail(&mut self, error: Error) -> Result<()> {
        error!("{error}");
        self.state = State::Failed;
        self.errors.push(error.to_string());
        Err(error)
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    // --- Accessors ---

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == State::Ready
    }

    /// Fatal error messages raised by the last open, one per failure.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// File the container was opened from, if it came from disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Archive path of the package document in use.
    pub fn package_path(&self) -> Option<&str> {
        self.package_path.as_deref()
    }

    /// Metadata value for `key`, or `""`.
    pub fn metadata(&self, key: &str) -> &str {
        self.metadata.value(key)
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.set(key, value);
    }

    /// Attributes recorded for metadata `key`.
    pub fn metadata_attributes(&self, key: &str) -> Option<&BTreeMap<String, String>> {
        self.metadata.attributes(key)
    }

    pub fn all_metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn items(&self) -> &ItemRegistry {
        &self.items
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    /// Manifest item stored at the archive path `path`.
    pub fn item_by_path(&self, path: &str) -> Option<&Item> {
        self.items.by_path(path)
    }

    pub fn references(&self) -> &ReferenceRegistry {
        &self.references
    }

    pub fn toc(&self) -> &TableOfContents {
        &self.toc
    }

    // --- Entry access ---

    /// Names of all archive entries.
    pub fn entries(&self) -> Vec<String> {
        self.archive.as_ref().map(Archive::entries).unwrap_or_default()
    }

    /// Raw bytes of an archive entry.
    pub fn read_entry(&mut self, path: &str) -> Result<Vec<u8>> {
        self.archive_mut()?.read(path)
    }

    /// An archive entry decoded as text.
    pub fn read_entry_string(&mut self, path: &str) -> Result<String> {
        let bytes = self.read_entry(path)?;
        Ok(decode_xml(&bytes).into_owned())
    }

    /// Raw bytes of a manifest item.
    pub fn read_item(&mut self, id: &str) -> Result<Vec<u8>> {
        let path = self
            .items
            .get(id)
            .map(|item| item.path.clone())
            .ok_or_else(|| Error::Item(format!("Asked for unknown item {id}")))?;
        self.read_entry(&path)
    }

    /// Decode the image stored under manifest `id`.
    ///
    /// Returns `None`, with a warning, for unknown ids, media types no
    /// decoder handles, and unreadable or corrupt data.
    #[cfg(feature = "image")]
    pub fn image(&mut self, id: &str) -> Option<image::DynamicImage> {
        let Some(item) = self.items.get(id) else {
            warn!("Asked for unknown item {id}");
            return None;
        };

        let format = image::ImageFormat::from_mime_type(&item.mimetype)
            .filter(|format| format.reading_enabled());
        let Some(format) = format else {
            warn!("Asked for unsupported type {}", item.mimetype);
            return None;
        };

        let path = item.path.clone();
        let bytes = match self.read_entry(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Unable to read {path}: {e}");
                return None;
            }
        };

        match image::load_from_memory_with_format(&bytes, format) {
            Ok(image) => Some(image),
            Err(e) => {
                warn!("Unable to decode {path}: {e}");
                None
            }
        }
    }
}
