//! Shared test fixtures.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let resolved = resolve(&project(), &landscape(), Some(1.0)).unwrap();
//! assert_dims(&resolved, 600, 600);
//! ```

use crate::batch::BatchEntry;
use crate::types::{ImageDescriptor, ProjectDetails, ResolvedImage};

/// 800x600 landscape asset without the `image-` prefix.
pub const LANDSCAPE_REF: &str = "img123-800x600-jpg";

/// URL prefix for [`LANDSCAPE_REF`] in [`project`].
pub const LANDSCAPE_BASE: &str = "https://cdn.sanity.io/images/p1/production/img123-800x600.jpg";

pub fn project() -> ProjectDetails {
    ProjectDetails::new("p1", "production")
}

pub fn landscape() -> ImageDescriptor {
    ImageDescriptor::new(LANDSCAPE_REF)
}

pub fn entry(reference: &str, aspect_ratio: Option<f64>) -> BatchEntry {
    BatchEntry {
        image: ImageDescriptor::new(reference),
        aspect_ratio,
    }
}

/// Assert a resolved variant has exactly `width` x `height`.
pub fn assert_dims(resolved: &ResolvedImage, width: u32, height: u32) {
    assert_eq!(
        (resolved.width, resolved.height),
        (width, height),
        "expected {width}x{height}, got {}x{} ({})",
        resolved.width,
        resolved.height,
        resolved.src
    );
}
