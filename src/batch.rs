//! Resolve many images at once.
//!
//! A batch is a JSON array of image descriptors in the CMS shape, each with
//! an optional per-entry `aspectRatio`:
//!
//! ```json
//! [
//!   { "asset": { "_ref": "image-abc-800x600-jpg" }, "aspectRatio": 1.0 },
//!   { "asset": { "_ref": "image-def-1920x1080-png" }, "crop": { "left": 0.1, "right": 0, "top": 0, "bottom": 0 } }
//! ]
//! ```
//!
//! Entries are resolved in parallel with [rayon](https://docs.rs/rayon)
//! through a shared [`ResolveCache`], so duplicate entries resolve once. One
//! failing entry does not abort the batch; each result carries its own
//! outcome and results keep input order.

use crate::cache::ResolveCache;
use crate::resolve::ResolveError;
use crate::types::{ImageDescriptor, ProjectDetails, ResolvedImage};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// One batch input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEntry {
    #[serde(flatten)]
    pub image: ImageDescriptor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
}

/// Outcome for one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    pub reference: String,
    pub outcome: Result<ResolvedImage, ResolveError>,
}

/// JSON form of a [`BatchResult`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport<'a> {
    pub reference: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<&'a ResolvedImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchResult {
    pub fn report(&self) -> BatchReport<'_> {
        BatchReport {
            reference: &self.reference,
            resolved: self.outcome.as_ref().ok(),
            error: self.outcome.as_ref().err().map(ToString::to_string),
        }
    }
}

/// Parse a batch file's contents.
pub fn parse_batch(json: &str) -> Result<Vec<BatchEntry>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Resolve every entry. `default_aspect` applies to entries without their own.
pub fn resolve_batch(
    project: &ProjectDetails,
    entries: &[BatchEntry],
    default_aspect: Option<f64>,
    cache: &ResolveCache,
) -> Vec<BatchResult> {
    entries
        .par_iter()
        .map(|entry| BatchResult {
            reference: entry.image.asset_reference().to_string(),
            outcome: cache.resolve(project, &entry.image, entry.aspect_ratio.or(default_aspect)),
        })
        .collect()
}
