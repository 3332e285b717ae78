//! Package model produced by the EPUB parsers.
//!
//! This module contains:
//! - Bibliographic metadata with its merge rules
//! - The manifest and its spine ordering
//! - Guide page references
//! - The NCX table of contents

mod items;
mod metadata;
mod references;
mod toc;

pub use items::{DOCUMENT_MEDIA_TYPES, Item, ItemRegistry};
pub use metadata::{CREATOR_SEPARATOR, Metadata, MetadataElement, MetadataKind};
pub use references::{PageReference, ReferenceRegistry, ReferenceType, StandardType, UnknownType};
pub use toc::{NavPoint, TableOfContents};
