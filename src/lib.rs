//! # quire
//!
//! Reads the structure of an EPUB package: bibliographic metadata, the
//! manifest, the spine reading order, guide references and the NCX table
//! of contents.
//!
//! ## Quick Start
//!
//! ```no_run
//! use quire::{EpubContainer, StandardType};
//!
//! let mut container = EpubContainer::new();
//! container.open("book.epub")?;
//!
//! println!("{} by {}", container.metadata("title"), container.metadata("creator"));
//! for id in container.items().ordered_ids() {
//!     println!("  {id}");
//! }
//! if let Some(cover) = container.references().standard(StandardType::CoverPage) {
//!     println!("Cover: {}", cover.target);
//! }
//! # Ok::<(), quire::Error>(())
//! ```
//!
//! Opening runs four stages in order: mimetype check, `container.xml`
//! lookup, package document parse and NCX parse. A failing stage aborts the
//! open; malformed fragments inside a stage are skipped with a
//! `tracing` warning.
//!
//! Content documents and images are not extracted up front. Use
//! [`EpubContainer::read_entry`] or [`EpubContainer::image`] once the
//! container is ready.

pub mod archive;
pub mod epub;
pub mod error;
pub mod model;
pub(crate) mod util;

pub use archive::Archive;
pub use epub::{EpubContainer, State};
pub use error::{Error, Result};
pub use model::{
    Item, ItemRegistry, Metadata, NavPoint, PageReference, ReferenceRegistry, ReferenceType,
    StandardType, TableOfContents,
};
