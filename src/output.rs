//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.
//!
//! ## Resolve
//!
//! ```text
//! img123-800x600-jpg → 600x600
//!     Natural: 800x600
//!     URL: https://cdn.sanity.io/images/p1/production/img123-800x600.jpg?rect=100,0,600,600&w=600&h=600
//! ```
//!
//! ## Hint
//!
//! ```text
//! img123-800x600-jpg → 640x320 (fill in 300x300)
//!     sizes: 600px
//!     object-position: left 50% top 50%
//!     aspect-ratio: 2
//! ```
//!
//! ## Batch
//!
//! ```text
//! 001 img123-800x600-jpg → 600x600
//!     URL: https://cdn.sanity.io/...
//! 002 abc-notasize-jpg
//!     Error: Malformed asset reference: ...
//!
//! Resolved 1 of 2 images (1 failed)
//! Cache: 2 resolved
//! ```

use crate::asset::parse_asset_reference;
use crate::batch::BatchResult;
use crate::cache::CacheStats;
use crate::sizing::{ObjectPosition, Size, SizingMode, sizes_attribute, sizes_hint};
use crate::types::ResolvedImage;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn dims(resolved: &ResolvedImage) -> String {
    format!("{}x{}", resolved.width, resolved.height)
}

/// Format a single resolved variant.
pub fn format_resolved(reference: &str, resolved: &ResolvedImage) -> Vec<String> {
    let mut lines = vec![format!("{} → {}", reference, dims(resolved))];
    if let Ok(asset) = parse_asset_reference(reference) {
        lines.push(format!(
            "{}Natural: {}x{}",
            indent(1),
            asset.width,
            asset.height
        ));
    }
    lines.push(format!("{}URL: {}", indent(1), resolved.src));
    lines
}

pub fn print_resolved(reference: &str, resolved: &ResolvedImage) {
    for line in format_resolved(reference, resolved) {
        println!("{}", line);
    }
}

/// Format the presentation hints for a resolved variant in a measured box.
pub fn format_hint(
    reference: &str,
    resolved: &ResolvedImage,
    mode: SizingMode,
    measured: Size,
    position: ObjectPosition,
) -> Vec<String> {
    vec![
        format!(
            "{} → {} ({} in {}x{})",
            reference,
            dims(resolved),
            mode.as_str(),
            measured.width,
            measured.height
        ),
        format!(
            "{}sizes: {}",
            indent(1),
            sizes_attribute(sizes_hint(mode, resolved, Some(measured)))
        ),
        format!("{}object-position: {}", indent(1), position),
        format!("{}aspect-ratio: {}", indent(1), resolved.aspect_ratio()),
    ]
}

pub fn print_hint(
    reference: &str,
    resolved: &ResolvedImage,
    mode: SizingMode,
    measured: Size,
    position: ObjectPosition,
) {
    for line in format_hint(reference, resolved, mode, measured, position) {
        println!("{}", line);
    }
}

/// Format batch results followed by a summary.
pub fn format_batch(results: &[BatchResult], stats: CacheStats) -> Vec<String> {
    let mut lines = Vec::new();
    let mut failed = 0;

    for (i, result) in results.iter().enumerate() {
        let index = format_index(i + 1);
        match &result.outcome {
            Ok(resolved) => {
                lines.push(format!("{} {} → {}", index, result.reference, dims(resolved)));
                lines.push(format!("{}URL: {}", indent(1), resolved.src));
            }
            Err(e) => {
                failed += 1;
                lines.push(format!("{} {}", index, result.reference));
                lines.push(format!("{}Error: {}", indent(1), e));
            }
        }
    }

    lines.push(String::new());
    let ok = results.len() - failed;
    if failed > 0 {
        lines.push(format!(
            "Resolved {} of {} images ({} failed)",
            ok,
            results.len(),
            failed
        ));
    } else {
        lines.push(format!(
            "Resolved {} {}",
            ok,
            if ok == 1 { "image" } else { "images" }
        ));
    }
    lines.push(format!("Cache: {}", stats));
    lines
}

pub fn print_batch(results: &[BatchResult], stats: CacheStats) {
    for line in format_batch(results, stats) {
        println!("{}", line);
    }
}
