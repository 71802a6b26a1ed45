//! # sanity-image
//!
//! Resolve responsively-cropped image variants served by the Sanity image
//! CDN. Given a project, an image field (asset reference, crop, hotspot) and
//! an optional target aspect ratio, [`resolve`](resolve::resolve) computes
//! the exact pixel size of the variant and a URL that serves it pre-cropped.
//!
//! ```
//! use sanity_image::resolve::resolve;
//! use sanity_image::types::{Crop, ImageDescriptor, ProjectDetails};
//!
//! let project = ProjectDetails::new("p1", "production");
//! let image = ImageDescriptor::new("image-abc123-800x600-jpg")
//!     .with_crop(Crop::new(0.1, 0.1, 0.0, 0.0));
//!
//! let resolved = resolve(&project, &image, Some(2.0)).unwrap();
//! assert_eq!((resolved.width, resolved.height), (640, 320));
//! assert_eq!(
//!     resolved.src,
//!     "https://cdn.sanity.io/images/p1/production/abc123-800x600.jpg?rect=80,140,640,320&w=640&h=320"
//! );
//! ```
//!
//! # Architecture
//!
//! ```text
//! asset ref ──parse──▶ natural W×H ──crop──▶ cropped W×H ──aspect──▶ final W×H
//!                                                                       │
//!                      crop + hotspot ──▶ source rect ──────────────────┴──▶ URL
//! ```
//!
//! Everything on that path is a pure function. Memoization, presentation
//! sizing and measurement debouncing sit beside it as separate modules a UI
//! layer can pick from.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`resolve`] | The resolver: natural size → crop → aspect fit → URL |
//! | [`asset`] | `<id>-<W>x<H>-<ext>` asset reference parser |
//! | [`imaging`] | Pure dimension math, URL parameter types, and the URL builder |
//! | [`types`] | Value types in the CMS JSON shape (`ProjectDetails`, `ImageDescriptor`, ...) |
//! | [`cache`] | Thread-safe memoization of resolve results |
//! | [`batch`] | Parallel resolution of many images |
//! | [`sizing`] | `sizes` hint policy and hotspot object-position |
//! | [`debounce`] | Debounced element-size stream and scoped size watcher |
//! | [`config`] | `sanity-image.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Explicit Project Details
//!
//! The project and dataset are a plain argument to every call. There is no
//! ambient "current project": a resolver without a project cannot be
//! constructed, so the missing-provider failure mode does not exist.
//!
//! ## Natural Size From the Reference
//!
//! Asset references embed the stored pixel size. Reading it from there means
//! resolving never needs the asset document or any network access.
//!
//! ## Rounding
//!
//! Every pixel computation rounds half away from zero ([`f64::round`]). A
//! result below one pixel is an error
//! ([`ResolveError::DegenerateCrop`](resolve::ResolveError::DegenerateCrop)),
//! never silently clamped.
//!
//! ## Crop, Never Pad
//!
//! Fitting to an aspect ratio only ever trims one axis of the cropped image.
//! The result is always contained in the crop, so nothing is upsampled.

pub mod asset;
pub mod batch;
pub mod cache;
pub mod config;
pub mod debounce;
pub mod imaging;
pub mod output;
pub mod resolve;
pub mod sizing;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
