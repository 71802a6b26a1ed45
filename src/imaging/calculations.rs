//! Pure calculation functions for variant geometry.
//!
//! All functions here are pure and testable without any I/O. Rounding is
//! half away from zero ([`f64::round`]) throughout, and a dimension that
//! rounds below one pixel is an error rather than being clamped.

use super::params::PixelRect;
use crate::resolve::ResolveError;
use crate::types::{Crop, Hotspot};

/// Round a pixel measure to the nearest integer, half away from zero.
fn round_px(value: f64) -> i64 {
    value.round() as i64
}

/// Convert a rounded measure into a dimension, rejecting anything below 1.
fn positive_dimension(value: f64, what: &str) -> Result<u32, ResolveError> {
    let px = round_px(value);
    if px < 1 || px > u32::MAX as i64 {
        return Err(ResolveError::DegenerateCrop(format!(
            "{what} rounds to {px}px"
        )));
    }
    Ok(px as u32)
}

fn check_edge(value: f64, edge: &str) -> Result<(), ResolveError> {
    if !(0.0..1.0).contains(&value) {
        return Err(ResolveError::DegenerateCrop(format!(
            "crop.{edge} = {value} is outside [0, 1)"
        )));
    }
    Ok(())
}

/// Dimensions left after trimming `crop` from a `natural` (width, height).
///
/// # Examples
/// ```
/// # use sanity_image::imaging::calculate_cropped_dimensions;
/// # use sanity_image::types::Crop;
/// let crop = Crop::new(0.1, 0.1, 0.0, 0.0);
/// assert_eq!(calculate_cropped_dimensions((800, 600), &crop).unwrap(), (640, 600));
/// ```
pub fn calculate_cropped_dimensions(
    natural: (u32, u32),
    crop: &Crop,
) -> Result<(u32, u32), ResolveError> {
    check_edge(crop.left, "left")?;
    check_edge(crop.right, "right")?;
    check_edge(crop.top, "top")?;
    check_edge(crop.bottom, "bottom")?;

    let (w, h) = natural;
    let width = positive_dimension(w as f64 * crop.width_fraction(), "cropped width")?;
    let height = positive_dimension(h as f64 * crop.height_fraction(), "cropped height")?;
    Ok((width, height))
}

/// Shrink `source` to `aspect_ratio` (width / height) by trimming one axis.
///
/// When the target is wider than the source the height shrinks, otherwise
/// the width does. The result always fits inside `source`.
///
/// # Examples
/// ```
/// # use sanity_image::imaging::calculate_aspect_dimensions;
/// assert_eq!(calculate_aspect_dimensions((800, 600), 1.0).unwrap(), (600, 600));
/// assert_eq!(calculate_aspect_dimensions((640, 600), 2.0).unwrap(), (640, 320));
/// ```
pub fn calculate_aspect_dimensions(
    source: (u32, u32),
    aspect_ratio: f64,
) -> Result<(u32, u32), ResolveError> {
    if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
        return Err(ResolveError::InvalidAspectRatio(aspect_ratio));
    }

    let (w, h) = source;
    let natural = w as f64 / h as f64;

    if aspect_ratio > natural {
        // Target is wider: keep width, shrink height
        let height = positive_dimension(w as f64 / aspect_ratio, "fitted height")?;
        Ok((w, height))
    } else {
        // Target is narrower or equal: keep height, shrink width
        let width = positive_dimension(h as f64 * aspect_ratio, "fitted width")?;
        Ok((width, h))
    }
}

/// Crop rectangle in natural pixel coordinates.
///
/// Left/top edges are rounded first and the extents are taken from what
/// remains, so the rectangle never extends past the image.
pub fn calculate_crop_rect(natural: (u32, u32), crop: &Crop) -> PixelRect {
    let (w, h) = (natural.0 as f64, natural.1 as f64);
    let left = round_px(crop.left * w).clamp(0, natural.0 as i64);
    let top = round_px(crop.top * h).clamp(0, natural.1 as i64);
    let width = round_px(w - crop.right * w - left as f64).clamp(0, natural.0 as i64 - left);
    let height = round_px(h - crop.bottom * h - top as f64).clamp(0, natural.1 as i64 - top);
    PixelRect::new(left as u32, top as u32, width as u32, height as u32)
}

/// Fit a source rectangle of `desired_aspect` inside `crop`, centred on the
/// hotspot as far as the crop allows.
///
/// If the crop is wider than desired the sides are cut and the rectangle
/// slides horizontally toward the hotspot; otherwise top and bottom are cut
/// and it slides vertically.
pub fn calculate_fit_rect(
    natural: (u32, u32),
    crop: PixelRect,
    hotspot: &Hotspot,
    desired_aspect: f64,
) -> PixelRect {
    let crop_aspect = crop.width as f64 / crop.height as f64;
    let crop_left = crop.left as i64;
    let crop_top = crop.top as i64;

    if crop_aspect > desired_aspect {
        let height = crop.height as i64;
        let width = round_px(height as f64 * desired_aspect).min(crop.width as i64);
        let center_x = round_px(hotspot.x * natural.0 as f64);
        let mut left = round_px(center_x as f64 - width as f64 / 2.0).max(0);
        if left < crop_left {
            left = crop_left;
        } else if left + width > crop_left + crop.width as i64 {
            left = crop_left + crop.width as i64 - width;
        }
        PixelRect::new(left.max(0) as u32, crop.top, width as u32, height as u32)
    } else {
        let width = crop.width as i64;
        let height = round_px(width as f64 / desired_aspect).min(crop.height as i64);
        let center_y = round_px(hotspot.y * natural.1 as f64);
        let mut top = round_px(center_y as f64 - height as f64 / 2.0).max(0);
        if top < crop_top {
            top = crop_top;
        } else if top + height > crop_top + crop.height as i64 {
            top = crop_top + crop.height as i64 - height;
        }
        PixelRect::new(crop.left, top.max(0) as u32, width as u32, height as u32)
    }
}
