//! OPF package document parsing: metadata, manifest, spine and guide.
//!
//! Malformed fragments are dropped with a warning; only an unreadable
//! document fails the parse.

use tracing::warn;

use crate::epub::xml::{Element, parse_document};
use crate::error::{Error, Result};
use crate::model::{
    Item, ItemRegistry, Metadata, MetadataElement, MetadataKind, PageReference,
    ReferenceRegistry, ReferenceType, StandardType,
};
use crate::util::{parent_dir, resolve_href, resolve_target};

/// Title given to the reference created from the spine's `toc` attribute.
pub const SPINE_TOC_TITLE: &str = "Table of Contents";

/// Everything read from one package document.
#[derive(Debug, Clone, Default)]
pub struct PackageDocument {
    pub metadata: Metadata,
    pub items: ItemRegistry,
    pub references: ReferenceRegistry,
    /// Manifest id named by `<spine toc="...">`, when it resolved.
    pub ncx_id: Option<String>,
}

/// Parse a package document located at `package_path` inside the archive.
///
/// Relative hrefs are resolved against the directory of `package_path`.
pub fn parse_package(content: &str, package_path: &str) -> Result<PackageDocument> {
    let root = parse_document(content)?;
    let base_dir = parent_dir(package_path);

    let mut package = PackageDocument::default();

    for metadata in root.descendants("metadata") {
        for child in metadata.child_elements() {
            parse_metadata_item(&mut package.metadata, child);
        }
    }

    for manifest in root.descendants("manifest") {
        for item in manifest.descendants("item") {
            parse_manifest_item(&mut package.items, item, base_dir);
        }
    }

    for spine in root.descendants("spine") {
        let toc_id = spine.attr_or_empty("toc");
        if !toc_id.is_empty() && package.items.contains(toc_id) {
            package.references.insert(PageReference {
                target: toc_id.to_string(),
                title: SPINE_TOC_TITLE.to_string(),
                kind: ReferenceType::Standard(StandardType::TableOfContents),
            });
            package.ncx_id = Some(toc_id.to_string());
        }

        for itemref in spine.descendants("itemref") {
            parse_spine_item(&mut package.items, itemref);
        }
    }

    for guide in root.descendants("guide") {
        for reference in guide.descendants("reference") {
            parse_guide_item(&mut package.references, reference, base_dir);
        }
    }

    Ok(package)
}

fn parse_metadata_item(metadata: &mut Metadata, element: &Element) {
    let metadata_element = MetadataElement {
        kind: MetadataKind::classify(element.prefix(), element.local_name()),
        attributes: element.attributes.clone(),
        text: element.text().trim().to_string(),
    };

    if let Err(e) = metadata.insert_element(&metadata_element) {
        warn!("{e}");
    }
}

fn parse_manifest_item(items: &mut ItemRegistry, element: &Element, base_dir: &str) {
    let id = element.attr_or_empty("id").trim();
    let href = element.attr_or_empty("href").trim();

    if id.is_empty() || href.is_empty() {
        warn!(
            "{}",
            Error::Item(format!("Manifest item without id or href (id={id:?}, href={href:?})"))
        );
        return;
    }

    let item = Item::new(id, element.attr_or_empty("media-type"), resolve_href(base_dir, href));
    if let Some(previous) = items.insert(item) {
        warn!("Manifest id {} declared twice, replacing {}", id, previous.path);
    }
}

fn parse_spine_item(items: &mut ItemRegistry, element: &Element) {
    let idref = element.attr_or_empty("idref").trim();
    if idref.is_empty() {
        warn!("{}", Error::Item("Spine item without idref".into()));
        return;
    }

    let linear = element.attr("linear") != Some("no");
    if let Err(e) = items.promote(idref, linear) {
        warn!("{e}");
    }
}

fn parse_guide_item(references: &mut ReferenceRegistry, element: &Element, base_dir: &str) {
    let target = element.attr_or_empty("href");
    let title = element.attr_or_empty("title");
    let kind = element.attr_or_empty("type");

    if target.is_empty() || title.is_empty() || kind.is_empty() {
        warn!(
            "{}",
            Error::Item(format!("Invalid guide item {target} {title} {kind}"))
        );
        return;
    }

    references.insert(PageReference {
        target: resolve_target(base_dir, target),
        title: title.to_string(),
        kind: ReferenceType::classify(kind),
    });
}
