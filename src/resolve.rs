//! The image geometry resolver.
//!
//! [`resolve`] turns an image descriptor into the exact pixel size and URL of
//! the variant to request:
//!
//! ```text
//! asset ref ──parse──▶ W0×H0 ──crop──▶ W1×H1 ──aspect──▶ W2×H2 ──▶ URL
//! ```
//!
//! Each stage is optional except parsing; the returned size is whatever the
//! last applied stage produced. The function is pure, so memoizing it (see
//! [`ResolveCache`](crate::cache::ResolveCache)) is purely a caller concern.

use crate::asset::parse_asset_reference;
use crate::imaging::{
    FitMode, ImageUrlBuilder, calculate_aspect_dimensions, calculate_cropped_dimensions,
};
use crate::types::{ImageDescriptor, ProjectDetails, ResolvedImage};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("Malformed asset reference: {0:?} (expected \"<id>-<width>x<height>-<ext>\")")]
    MalformedAssetReference(String),
    #[error("Degenerate crop: {0}")]
    DegenerateCrop(String),
    #[error("Invalid aspect ratio: {0} (must be finite and greater than zero)")]
    InvalidAspectRatio(f64),
    #[error("Invalid CDN base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Extra URL parameters applied to every resolved variant.
///
/// These never change the resolved width/height; they only ask the CDN for
/// a different encoding of the same pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VariantOptions {
    /// Append `auto=format` so the CDN negotiates WebP/AVIF.
    pub auto_format: bool,
    /// Lossy encoding quality (0-100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<u32>,
    /// Fit mode for the requested box.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit: Option<FitMode>,
}

/// Resolve the size and URL of an image variant.
///
/// # Examples
/// ```
/// # use sanity_image::resolve::resolve;
/// # use sanity_image::types::{ImageDescriptor, ProjectDetails};
/// let project = ProjectDetails::new("p1", "production");
/// let image = ImageDescriptor::new("img123-800x600-jpg");
/// let resolved = resolve(&project, &image, Some(1.0)).unwrap();
/// assert_eq!((resolved.width, resolved.height), (600, 600));
/// ```
pub fn resolve(
    project: &ProjectDetails,
    image: &ImageDescriptor,
    aspect_ratio: Option<f64>,
) -> Result<ResolvedImage, ResolveError> {
    resolve_with(project, image, aspect_ratio, &VariantOptions::default())
}

/// [`resolve`] with additional encoding options on the URL.
pub fn resolve_with(
    project: &ProjectDetails,
    image: &ImageDescriptor,
    aspect_ratio: Option<f64>,
    options: &VariantOptions,
) -> Result<ResolvedImage, ResolveError> {
    let asset = parse_asset_reference(image.asset_reference())?;
    let mut dims = (asset.width, asset.height);
    debug!(
        "resolving {}: natural {}x{}",
        image.asset_reference(),
        dims.0,
        dims.1
    );

    if let Some(crop) = &image.crop {
        dims = calculate_cropped_dimensions(dims, crop)?;
        debug!("  cropped to {}x{}", dims.0, dims.1);
    }

    if let Some(ratio) = aspect_ratio {
        dims = calculate_aspect_dimensions(dims, ratio)?;
        debug!("  fitted to aspect {ratio}: {}x{}", dims.0, dims.1);
    }

    let (width, height) = dims;
    let mut builder = ImageUrlBuilder::new(project).image(image)?.size(width, height);
    if options.auto_format {
        builder = builder.auto_format();
    }
    if let Some(quality) = options.quality {
        builder = builder.quality(quality);
    }
    if let Some(fit) = options.fit {
        builder = builder.fit(fit);
    }

    Ok(ResolvedImage {
        src: builder.url()?,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use crate::types::{Crop, Hotspot};

    const BASE: &str = LANDSCAPE_BASE;

    #[test]
    fn natural_size_without_crop_or_aspect() {
        let r = resolve(&project(), &landscape(), None).unwrap();
        assert_dims(&r, 800, 600);
        assert_eq!(r.src, format!("{BASE}?w=800&h=600"));
    }

    #[test]
    fn square_aspect_from_landscape() {
        let r = resolve(
            &project(),
            &landscape(),
            Some(1.0),
        )
        .unwrap();
        assert_eq!((r.width, r.height), (600, 600));
        assert_eq!(r.src, format!("{BASE}?rect=100,0,600,600&w=600&h=600"));
    }

    #[test]
    fn crop_then_wider_aspect() {
        let image =
            landscape().with_crop(Crop::new(0.1, 0.1, 0.0, 0.0));

        let cropped = resolve(&project(), &image, None).unwrap();
        assert_eq!((cropped.width, cropped.height), (640, 600));
        assert_eq!(cropped.src, format!("{BASE}?rect=80,0,640,600&w=640&h=600"));

        let fitted = resolve(&project(), &image, Some(2.0)).unwrap();
        assert_eq!((fitted.width, fitted.height), (640, 320));
        assert_eq!(fitted.src, format!("{BASE}?rect=80,140,640,320&w=640&h=320"));
    }

    #[test]
    fn hotspot_moves_rect_not_size() {
        let centred = landscape();
        let shifted = centred.clone().with_hotspot(Hotspot::at(0.9, 0.5));
        let a = resolve(&project(), &centred, Some(1.0)).unwrap();
        let b = resolve(&project(), &shifted, Some(1.0)).unwrap();
        assert_eq!((a.width, a.height), (b.width, b.height));
        assert_eq!(b.src, format!("{BASE}?rect=200,0,600,600&w=600&h=600"));
    }

    #[test]
    fn zero_crop_matches_no_crop() {
        let plain = landscape();
        let zero = plain.clone().with_crop(Crop::default());
        assert_eq!(
            resolve(&project(), &plain, Some(1.5)).unwrap(),
            resolve(&project(), &zero, Some(1.5)).unwrap()
        );
    }

    #[test]
    fn malformed_reference_is_an_error() {
        let err = resolve(&project(), &ImageDescriptor::new("abc-notasize-jpg"), None).unwrap_err();
        assert_eq!(
            err,
            ResolveError::MalformedAssetReference("abc-notasize-jpg".to_string())
        );
    }

    #[test]
    fn degenerate_crop_is_an_error() {
        let image =
            landscape().with_crop(Crop::new(0.0, 0.0, 0.6, 0.4));
        assert!(matches!(
            resolve(&project(), &image, None),
            Err(ResolveError::DegenerateCrop(_))
        ));
    }

    #[test]
    fn non_positive_aspect_is_an_error() {
        let image = landscape();
        assert_eq!(
            resolve(&project(), &image, Some(0.0)),
            Err(ResolveError::InvalidAspectRatio(0.0))
        );
    }

    #[test]
    fn options_extend_url_only() {
        let options = VariantOptions {
            auto_format: true,
            quality: Some(80),
            fit: Some(FitMode::Crop),
        };
        let r = resolve_with(
            &project(),
            &landscape(),
            None,
            &options,
        )
        .unwrap();
        assert_eq!((r.width, r.height), (800, 600));
        assert_eq!(r.src, format!("{BASE}?w=800&h=600&q=80&fit=crop&auto=format"));
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let image = ImageDescriptor::new("image-abc-1920x1080-png")
            .with_crop(Crop::new(0.05, 0.1, 0.2, 0.0))
            .with_hotspot(Hotspot::at(0.3, 0.3));
        let first = resolve(&project(), &image, Some(0.75)).unwrap();
        let second = resolve(&project(), &image, Some(0.75)).unwrap();
        assert_eq!(first, second);
    }
}
