//! Bibliographic metadata store.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Separator used when several `dc:creator` elements are merged.
pub const CREATOR_SEPARATOR: &str = "; ";

/// How a child of `<metadata>` contributes to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataKind {
    /// `<meta name="..." content="..."/>`: name and value both come from attributes.
    Meta,
    /// `<dc:date event="...">`: keyed by the `event` attribute.
    Date,
    /// `<dc:creator>`: merged with any earlier creator.
    Creator,
    /// Any other Dublin Core element, keyed by its local name.
    DublinCore(String),
    /// Anything outside the `dc` prefix that is not `meta`.
    Unsupported(String),
}

impl MetadataKind {
    /// Classify an element by namespace prefix and local name.
    pub fn classify(prefix: Option<&str>, local_name: &str) -> Self {
        if local_name == "meta" {
            return MetadataKind::Meta;
        }
        if prefix != Some("dc") {
            let qualified = match prefix {
                Some(prefix) => format!("{prefix}:{local_name}"),
                None => local_name.to_string(),
            };
            return MetadataKind::Unsupported(qualified);
        }
        match local_name {
            "date" => MetadataKind::Date,
            "creator" => MetadataKind::Creator,
            other => MetadataKind::DublinCore(other.to_string()),
        }
    }
}

/// One child element of `<metadata>`, already reduced to the parts the
/// store cares about.
#[derive(Debug, Clone)]
pub struct MetadataElement {
    pub kind: MetadataKind,
    /// Attributes in document order, qualified names.
    pub attributes: Vec<(String, String)>,
    /// Trimmed text content.
    pub text: String,
}

impl MetadataElement {
    fn attribute(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == local || name.rsplit(':').next() == Some(local))
            .map(|(_, value)| value.as_str())
    }
}

/// Key/value metadata with per-key attribute maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Metadata {
    values: BTreeMap<String, String>,
    attributes: BTreeMap<String, BTreeMap<String, String>>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Value for `key`, or `""` when absent.
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    /// Overwrite a single value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Attribute map recorded for `key`, if the element that wrote it had any.
    pub fn attributes(&self, key: &str) -> Option<&BTreeMap<String, String>> {
        self.attributes.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Merge one metadata element into the store.
    ///
    /// Returns `Ok(true)` when a value was written and `Ok(false)` when the
    /// element resolved to an empty name or value and was dropped.
    /// Unsupported elements are an [`Error::Item`].
    pub fn insert_element(&mut self, element: &MetadataElement) -> Result<bool> {
        let (name, value) = match &element.kind {
            MetadataKind::Meta => (
                element.attribute("name").unwrap_or_default().to_string(),
                element.attribute("content").unwrap_or_default().to_string(),
            ),
            MetadataKind::Date => (
                element.attribute("event").unwrap_or_default().to_string(),
                element.text.clone(),
            ),
            MetadataKind::Creator => {
                if element.text.is_empty() {
                    return Ok(false);
                }
                let value = match self.get("creator") {
                    Some(existing) if !existing.is_empty() => {
                        format!("{existing}{CREATOR_SEPARATOR}{}", element.text)
                    }
                    _ => element.text.clone(),
                };
                ("creator".to_string(), value)
            }
            MetadataKind::DublinCore(tag) => (tag.clone(), element.text.clone()),
            MetadataKind::Unsupported(tag) => {
                return Err(Error::Item(format!("Unsupported metadata tag {tag}")));
            }
        };

        if name.is_empty() || value.is_empty() {
            return Ok(false);
        }

        let attributes: BTreeMap<String, String> = element
            .attributes
            .iter()
            .filter(|(key, _)| key != "xmlns" && !key.starts_with("xmlns:"))
            .cloned()
            .collect();
        if !attributes.is_empty() {
            self.attributes.insert(name.clone(), attributes);
        }
        self.values.insert(name, value);

        Ok(true)
    }
}
