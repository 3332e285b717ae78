//! Manifest items and reading order.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::error::{Error, Result};

/// Media types of content documents. Only these start out unordered; the
/// spine may later promote them.
pub const DOCUMENT_MEDIA_TYPES: [&str; 3] = [
    "text/x-oeb1-document",
    "application/x-dtbook+xml",
    "application/xhtml+xml",
];

/// A manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Item {
    pub id: String,
    pub mimetype: String,
    /// Archive path, already resolved against the package document's directory.
    pub path: String,
}

impl Item {
    pub fn new(id: impl Into<String>, mimetype: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            mimetype: mimetype.into(),
            path: path.into(),
        }
    }

    /// True for the content-document media types.
    pub fn is_document(&self) -> bool {
        DOCUMENT_MEDIA_TYPES.contains(&self.mimetype.as_str())
    }
}

/// The manifest plus its partition into spine-ordered and unordered ids.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ItemRegistry {
    items: HashMap<String, Item>,
    ordered: Vec<String>,
    unordered: BTreeSet<String>,
    non_linear: HashSet<String>,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a manifest item.
    ///
    /// Document items are pre-registered as unordered. A repeated id replaces
    /// the earlier item and returns it.
    pub fn insert(&mut self, item: Item) -> Option<Item> {
        if !item.is_document() {
            self.unordered.remove(&item.id);
        } else if !self.ordered.contains(&item.id) {
            self.unordered.insert(item.id.clone());
        }
        self.items.insert(item.id.clone(), item)
    }

    /// Append `id` to the reading order, moving it out of the unordered set.
    ///
    /// Fails with [`Error::Item`] when the id is not in the manifest or is
    /// already in the reading order.
    pub fn promote(&mut self, id: &str, linear: bool) -> Result<()> {
        if !self.items.contains_key(id) {
            return Err(Error::Item(format!("Unable to find {id} in items")));
        }
        if self.ordered.iter().any(|existing| existing == id) {
            return Err(Error::Item(format!("Spine already lists {id}")));
        }

        self.unordered.remove(id);
        self.ordered.push(id.to_string());
        if !linear {
            self.non_linear.insert(id.to_string());
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// First item stored at `path`.
    pub fn by_path(&self, path: &str) -> Option<&Item> {
        self.items.values().find(|item| item.path == path)
    }

    /// Ids in spine order.
    pub fn ordered_ids(&self) -> &[String] {
        &self.ordered
    }

    /// Document ids that the spine never referenced, sorted.
    pub fn unordered_ids(&self) -> &BTreeSet<String> {
        &self.unordered
    }

    /// Items in spine order.
    pub fn ordered_items(&self) -> impl Iterator<Item = &Item> {
        self.ordered.iter().filter_map(|id| self.items.get(id))
    }

    /// False for spine entries marked `linear="no"`.
    pub fn is_linear(&self, id: &str) -> bool {
        !self.non_linear.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
