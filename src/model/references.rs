//! Guide and page references.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The standard guide reference types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum StandardType {
    CoverPage,
    TitlePage,
    TableOfContents,
    Index,
    Glossary,
    Acknowledgements,
    Bibliography,
    Colophon,
    CopyrightPage,
    Dedication,
    Epigraph,
    Foreword,
    ListOfIllustrations,
    ListOfTables,
    Notes,
    Preface,
    Text,
}

impl StandardType {
    pub const ALL: [StandardType; 17] = [
        StandardType::CoverPage,
        StandardType::TitlePage,
        StandardType::TableOfContents,
        StandardType::Index,
        StandardType::Glossary,
        StandardType::Acknowledgements,
        StandardType::Bibliography,
        StandardType::Colophon,
        StandardType::CopyrightPage,
        StandardType::Dedication,
        StandardType::Epigraph,
        StandardType::Foreword,
        StandardType::ListOfIllustrations,
        StandardType::ListOfTables,
        StandardType::Notes,
        StandardType::Preface,
        StandardType::Text,
    ];

    /// The `type` attribute value for this reference.
    pub fn as_str(self) -> &'static str {
        match self {
            StandardType::CoverPage => "cover",
            StandardType::TitlePage => "title-page",
            StandardType::TableOfContents => "toc",
            StandardType::Index => "index",
            StandardType::Glossary => "glossary",
            StandardType::Acknowledgements => "acknowledgements",
            StandardType::Bibliography => "bibliography",
            StandardType::Colophon => "colophon",
            StandardType::CopyrightPage => "copyright-page",
            StandardType::Dedication => "dedication",
            StandardType::Epigraph => "epigraph",
            StandardType::Foreword => "foreword",
            StandardType::ListOfIllustrations => "loi",
            StandardType::ListOfTables => "lot",
            StandardType::Notes => "notes",
            StandardType::Preface => "preface",
            StandardType::Text => "text",
        }
    }
}

impl fmt::Display for StandardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a `type` string is not one of the standard types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownType(pub String);

impl FromStr for StandardType {
    type Err = UnknownType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StandardType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| UnknownType(s.to_string()))
    }
}

/// Classification of a reference's `type` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ReferenceType {
    Standard(StandardType),
    Other(String),
}

impl ReferenceType {
    pub fn classify(raw: &str) -> Self {
        match raw.parse::<StandardType>() {
            Ok(ty) => ReferenceType::Standard(ty),
            Err(UnknownType(raw)) => ReferenceType::Other(raw),
        }
    }
}

/// A named, typed shortcut into the package.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PageReference {
    pub target: String,
    pub title: String,
    pub kind: ReferenceType,
}

/// Page references split into the standard and "other" buckets.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReferenceRegistry {
    standard: BTreeMap<StandardType, PageReference>,
    other: BTreeMap<String, PageReference>,
}

impl ReferenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a reference in the bucket its type selects. Last write wins.
    pub fn insert(&mut self, reference: PageReference) {
        match &reference.kind {
            ReferenceType::Standard(ty) => {
                self.standard.insert(*ty, reference);
            }
            ReferenceType::Other(raw) => {
                self.other.insert(raw.clone(), reference);
            }
        }
    }

    pub fn standard(&self, ty: StandardType) -> Option<&PageReference> {
        self.standard.get(&ty)
    }

    pub fn other(&self, raw: &str) -> Option<&PageReference> {
        self.other.get(raw)
    }

    pub fn standard_references(&self) -> &BTreeMap<StandardType, PageReference> {
        &self.standard
    }

    pub fn other_references(&self) -> &BTreeMap<String, PageReference> {
        &self.other
    }

    pub fn len(&self) -> usize {
        self.standard.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.standard.is_empty() && self.other.is_empty()
    }
}
