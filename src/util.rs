//! Text decoding and archive path helpers.

use std::borrow::Cow;

/// Decode bytes to a string, handling various encodings.
///
/// This function:
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. If malformed, tries the hint encoding (from `<?xml encoding="..."?>`)
/// 3. Falls back to Windows-1252 (common in old ebooks)
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Decode an XML document read from the archive, honouring its declaration.
pub fn decode_xml(bytes: &[u8]) -> Cow<'_, str> {
    decode_text(bytes, extract_xml_encoding(bytes))
}

/// Extract encoding from XML declaration.
///
/// Parses `<?xml ... encoding="..." ?>` to extract the encoding name.
/// Only the first 100 bytes are checked.
pub fn extract_xml_encoding(bytes: &[u8]) -> Option<&str> {
    let check_len = bytes.len().min(100);
    let prefix = &bytes[..check_len];

    let xml_start = prefix.windows(5).position(|w| w == b"<?xml")?;
    let after_xml = &prefix[xml_start..];

    let enc_pos = after_xml
        .windows(9)
        .position(|w| w.eq_ignore_ascii_case(b"encoding="))?;
    let after_enc = &after_xml[enc_pos + 9..];

    if after_enc.is_empty() {
        return None;
    }

    let quote = after_enc[0];
    if quote != b'"' && quote != b'\'' {
        return None;
    }

    let value_start = 1;
    let value_end = after_enc[value_start..].iter().position(|&b| b == quote)? + value_start;

    std::str::from_utf8(&after_enc[value_start..value_end]).ok()
}

// ============================================================================
// Archive Paths
// ============================================================================

/// Directory part of an archive path, including the trailing slash.
///
/// `"OEBPS/content.opf"` gives `"OEBPS/"`; a path without a directory (or
/// one whose only separator is the leading one) gives `""`.
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) if idx > 0 => &path[..=idx],
        _ => "",
    }
}

/// Resolve `href` against the directory `base_dir` and normalize the result.
///
/// An absolute href is taken from the archive root. The result never starts
/// with `/`, since archive entry names don't.
pub fn resolve_href(base_dir: &str, href: &str) -> String {
    let path = if href.starts_with('/') {
        clean_path(href)
    } else {
        clean_path(&format!("{base_dir}{href}"))
    };
    path.trim_start_matches('/').to_string()
}

/// Like [`resolve_href`], but keeps a trailing `#fragment` untouched.
pub fn resolve_target(base_dir: &str, href: &str) -> String {
    match href.split_once('#') {
        Some((path, fragment)) if !path.is_empty() => {
            format!("{}#{fragment}", resolve_href(base_dir, path))
        }
        Some(_) => href.to_string(),
        None => resolve_href(base_dir, href),
    }
}

/// Normalize a `/`-separated archive path.
///
/// Collapses repeated separators, drops `.` segments and folds `..` into the
/// preceding segment. A `..` with nothing left to fold is kept for relative
/// paths and dropped for absolute ones.
pub fn clean_path(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}
