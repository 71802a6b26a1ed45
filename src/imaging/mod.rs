//! Variant geometry and URL construction. Pure functions, no I/O.
//!
//! | Concern | Function / type |
//! |---|---|
//! | **Crop** | [`calculate_cropped_dimensions`] |
//! | **Aspect fit** | [`calculate_aspect_dimensions`] |
//! | **Source rect** | [`calculate_crop_rect`], [`calculate_fit_rect`] |
//! | **URL** | [`ImageUrlBuilder`] |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing a variant request
//! - **URL builder**: Encodes parameters into the CDN's query convention

mod calculations;
mod params;
pub mod url_builder;

pub use calculations::{
    calculate_aspect_dimensions, calculate_crop_rect, calculate_cropped_dimensions,
    calculate_fit_rect,
};
pub use params::{CropMode, FitMode, ImageFormat, Orientation, PixelRect, Quality};
pub use url_builder::ImageUrlBuilder;
