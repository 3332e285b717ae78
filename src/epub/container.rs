//! `META-INF/container.xml` parsing.

use crate::epub::xml::parse_document;
use crate::error::Result;

/// Parse container.xml and return every `rootfile` `full-path`, in document
/// order. Empty values are kept so the caller can report them.
pub fn parse_container_xml(content: &str) -> Result<Vec<String>> {
    let root = parse_document(content)?;
    Ok(root
        .descendants("rootfile")
        .into_iter()
        .map(|rootfile| rootfile.attr_or_empty("full-path").trim().to_string())
        .collect())
}
