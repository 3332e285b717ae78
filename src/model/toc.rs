//! NCX table of contents.

use std::collections::BTreeMap;

/// One `<navPoint>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NavPoint {
    pub class: String,
    pub id: String,
    pub label: String,
    /// The `src` of the `<content>` child, unresolved.
    pub source: String,
    /// Parsed `playOrder`; `None` when missing or not a number.
    pub play_order: Option<u32>,
    /// Nested navPoints in document order. They are not part of the navmap.
    pub children: Vec<NavPoint>,
}

impl NavPoint {
    pub fn new(
        class: impl Into<String>,
        id: impl Into<String>,
        label: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            class: class.into(),
            id: id.into(),
            label: label.into(),
            source: source.into(),
            play_order: None,
            children: Vec::new(),
        }
    }
}

/// Parsed NCX document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TableOfContents {
    pub version: String,
    pub xmlns: String,
    pub language: String,
    pub title: String,
    /// `<head><meta name content/></head>` pairs.
    pub metadata: BTreeMap<String, String>,
    /// Top-level navPoints keyed by play order.
    pub navmap: BTreeMap<u32, NavPoint>,
}

impl TableOfContents {
    pub fn is_empty(&self) -> bool {
        self.navmap.is_empty()
    }

    /// Top-level entries in play order.
    pub fn entries(&self) -> impl Iterator<Item = &NavPoint> {
        self.navmap.values()
    }
}
