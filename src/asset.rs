//! Parsing for the hyphen-delimited asset reference convention.
//!
//! Image asset references encode everything needed to address the stored
//! file without fetching the asset document:
//!
//! ```text
//! image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg
//! ^^^^^ ^^^^^^^^^^^^^^^^^^^^^^^^ ^^^^^^^^^ ^^^
//! kind  id                       W x H     format
//! ```
//!
//! The `image-` kind prefix is optional (`img123-800x600-jpg` is accepted).
//! The natural size is always the second-to-last segment and the format the
//! last, so the size segment is found from the right.

use crate::resolve::ResolveError;

const IMAGE_PREFIX: &str = "image";

/// Result of parsing an asset reference like `image-abc-800x600-jpg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAsset {
    /// Asset id without the `image-` prefix (e.g. `abc`).
    pub id: String,
    /// Natural pixel width.
    pub width: u32,
    /// Natural pixel height.
    pub height: u32,
    /// File format / extension (e.g. `jpg`).
    pub format: String,
}

impl ParsedAsset {
    /// Stored filename on the CDN: `<id>-<W>x<H>.<format>`.
    pub fn filename(&self) -> String {
        format!("{}-{}x{}.{}", self.id, self.width, self.height, self.format)
    }
}

/// Parse an asset reference.
///
/// - `"image-abc-800x600-jpg"` → id=`abc`, 800×600, format=`jpg`
/// - `"img123-800x600-jpg"` → id=`img123`, 800×600, format=`jpg`
/// - `"abc-notasize-jpg"` → `MalformedAssetReference`
pub fn parse_asset_reference(reference: &str) -> Result<ParsedAsset, ResolveError> {
    let malformed = || ResolveError::MalformedAssetReference(reference.to_string());

    let segments: Vec<&str> = reference.split('-').collect();
    if segments.len() < 3 {
        return Err(malformed());
    }

    let format = segments[segments.len() - 1];
    let size = segments[segments.len() - 2];
    let mut id_segments = &segments[..segments.len() - 2];
    if id_segments.len() > 1 && id_segments[0] == IMAGE_PREFIX {
        id_segments = &id_segments[1..];
    }

    if format.is_empty() || id_segments.iter().any(|s| s.is_empty()) {
        return Err(malformed());
    }
    let (width, height) = parse_size_segment(size).ok_or_else(malformed)?;

    Ok(ParsedAsset {
        id: id_segments.join("-"),
        width,
        height,
        format: format.to_string(),
    })
}

/// Parse `<int>x<int>` with both sides positive.
fn parse_size_segment(segment: &str) -> Option<(u32, u32)> {
    let (w, h) = segment.split_once('x')?;
    if !is_digits(w) || !is_digits(h) {
        return None;
    }
    let width: u32 = w.parse().ok()?;
    let height: u32 = h.parse().ok()?;
    (width > 0 && height > 0).then_some((width, height))
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
