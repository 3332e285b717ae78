//! NCX table of contents parsing.

use tracing::warn;

use crate::epub::xml::{Element, parse_document};
use crate::error::{Error, Result};
use crate::model::{NavPoint, TableOfContents};

/// Parse an NCX document.
///
/// Only the `<navPoint>` children of `<navMap>` are keyed into the navmap;
/// deeper navPoints are kept as [`NavPoint::children`]. A navPoint whose
/// `playOrder` is missing or not a number is left out of the navmap.
pub fn parse_ncx(content: &str) -> Result<TableOfContents> {
    let root = parse_document(content)?;

    let mut toc = TableOfContents {
        version: root.attr_or_empty("version").to_string(),
        xmlns: root.attr_or_empty("xmlns").to_string(),
        language: root.attr_or_empty("xml:lang").to_string(),
        ..Default::default()
    };

    if let Some(head) = root.first_child("head") {
        for meta in head.children_named("meta") {
            toc.metadata.insert(
                meta.attr_or_empty("name").to_string(),
                meta.attr_or_empty("content").to_string(),
            );
        }
    }

    if let Some(title) = root.first_child("docTitle") {
        toc.title = title.text().trim().to_string();
    }

    if let Some(nav_map) = root.first_child("navMap") {
        for element in nav_map.children_named("navPoint") {
            let nav_point = parse_nav_point(element);
            let Some(play_order) = nav_point.play_order else {
                warn!(
                    "{}",
                    Error::Item(format!(
                        "navPoint {:?} has invalid playOrder {:?}",
                        nav_point.id,
                        element.attr_or_empty("playOrder")
                    ))
                );
                continue;
            };

            if let Some(previous) = toc.navmap.insert(play_order, nav_point) {
                warn!(
                    "playOrder {} used twice, replacing navPoint {:?}",
                    play_order, previous.id
                );
            }
        }
    }

    Ok(toc)
}

fn parse_nav_point(element: &Element) -> NavPoint {
    let label = element
        .first_child("navLabel")
        .map(|label| label.text().trim().to_string())
        .unwrap_or_default();
    let source = element
        .first_child("content")
        .map(|content| content.attr_or_empty("src").to_string())
        .unwrap_or_default();

    let mut nav_point = NavPoint::new(
        element.attr_or_empty("class"),
        element.attr_or_empty("id"),
        label,
        source,
    );
    nav_point.play_order = element.attr("playOrder").and_then(|s| s.trim().parse().ok());
    nav_point.children = element
        .children_named("navPoint")
        .map(parse_nav_point)
        .collect();
    nav_point
}
