//! Presentation sizing policy.
//!
//! These functions decide the `sizes` hint a responsive image element should
//! advertise, so the browser downloads a variant matching what is actually
//! visible. They take the resolved variant and a measured element size and
//! are pure; measuring and debouncing live in [`debounce`](crate::debounce).
//!
//! | Mode | Hint |
//! |---|---|
//! | Inline / Block | measured element width |
//! | Fill | measured width, or `image_aspect × measured_height` when the image is wider than the box |
//!
//! The fill rule exists because `object-fit: cover` clips a wide image at the
//! sides. The visible slice is as tall as the box, so the full image has to be
//! requested at `aspect × height` to keep the visible part sharp.

use crate::types::{Crop, ImageDescriptor, ResolvedImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A measured element size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width over height. Infinite or NaN for a zero height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }
}

/// Parses `WIDTHxHEIGHT`, e.g. `300x200` or `320.5x180`.
impl FromStr for Size {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (w, h) = value
            .split_once('x')
            .ok_or_else(|| format!("{value:?}: expected WIDTHxHEIGHT"))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<f64>()
                .ok()
                .filter(|px| px.is_finite() && *px >= 0.0)
                .ok_or_else(|| format!("{value:?}: {part:?} is not a size in pixels"))
        };
        Ok(Self::new(parse(w)?, parse(h)?))
    }
}

/// How the image element is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizingMode {
    /// Inline element sized by CSS on one axis.
    Inline,
    /// Block element at 100% width, auto height.
    Block,
    /// Absolutely positioned, covering its container.
    Fill,
}

impl SizingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Block => "block",
            Self::Fill => "fill",
        }
    }
}

/// Hint in CSS pixels for a given mode and measurement.
///
/// `measured` is `None` before the first measurement; the hint is then 0.
pub fn sizes_hint(mode: SizingMode, image: &ResolvedImage, measured: Option<Size>) -> f64 {
    let Some(measured) = measured else {
        return 0.0;
    };
    match mode {
        SizingMode::Inline | SizingMode::Block => measured.width,
        SizingMode::Fill => fill_sizes_hint(image.aspect_ratio(), measured),
    }
}

/// Fill-mode hint: request the full image width needed for the visible slice.
pub fn fill_sizes_hint(image_aspect: f64, measured: Size) -> f64 {
    if image_aspect > measured.aspect_ratio() {
        image_aspect * measured.height
    } else {
        measured.width
    }
}

/// Format a hint as a `sizes` attribute value.
pub fn sizes_attribute(hint: f64) -> String {
    format!("{hint}px")
}

/// Where the image sits inside a `cover` box, as fractions (0.5 = centred).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectPosition {
    pub x: f64,
    pub y: f64,
}

impl Default for ObjectPosition {
    fn default() -> Self {
        Self { x: 0.5, y: 0.5 }
    }
}

impl ObjectPosition {
    /// Position that puts the hotspot as near the centre of the visible area
    /// as the box allows.
    ///
    /// The hotspot is stored relative to the natural image, so with a crop
    /// it is translated into the cropped frame first.
    pub fn for_image(image: &ImageDescriptor) -> Self {
        let Some(hotspot) = image.hotspot else {
            return Self::default();
        };
        match image.crop {
            Some(Crop {
                left,
                right,
                top,
                bottom,
            }) => Self {
                x: (hotspot.x - left) / (1.0 - left - right),
                y: (hotspot.y - top) / (1.0 - top - bottom),
            },
            None => Self {
                x: hotspot.x,
                y: hotspot.y,
            },
        }
    }
}

/// CSS `object-position` value, e.g. `left 50% top 50%`.
impl fmt::Display for ObjectPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "left {}% top {}%", self.x * 100.0, self.y * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Hotspot;

    fn resolved(width: u32, height: u32) -> ResolvedImage {
        ResolvedImage {
            src: String::new(),
            width,
            height,
        }
    }

    #[test]
    fn no_measurement_means_zero() {
        assert_eq!(sizes_hint(SizingMode::Block, &resolved(800, 600), None), 0.0);
        assert_eq!(sizes_hint(SizingMode::Fill, &resolved(800, 600), None), 0.0);
    }

    #[test]
    fn block_and_inline_use_measured_width() {
        let m = Some(Size::new(320.0, 1000.0));
        assert_eq!(sizes_hint(SizingMode::Block, &resolved(800, 600), m), 320.0);
        assert_eq!(sizes_hint(SizingMode::Inline, &resolved(800, 600), m), 320.0);
    }

    #[test]
    fn fill_with_narrower_image_uses_width() {
        // image 1:1 in a 2:1 box → image is not wider, width wins
        let hint = sizes_hint(SizingMode::Fill, &resolved(600, 600), Some(Size::new(400.0, 200.0)));
        assert_eq!(hint, 400.0);
    }

    #[test]
    fn fill_with_wider_image_scales_height() {
        // image 2:1 in a 1:1 box → 2 * 300
        let hint = sizes_hint(SizingMode::Fill, &resolved(640, 320), Some(Size::new(300.0, 300.0)));
        assert_eq!(hint, 600.0);
    }

    #[test]
    fn fill_with_zero_height_falls_back_to_width() {
        assert_eq!(fill_sizes_hint(2.0, Size::new(300.0, 0.0)), 300.0);
        assert_eq!(fill_sizes_hint(2.0, Size::new(0.0, 0.0)), 0.0);
    }

    #[test]
    fn sizes_attribute_formats_px() {
        assert_eq!(sizes_attribute(600.0), "600px");
        assert_eq!(sizes_attribute(412.5), "412.5px");
    }

    #[test]
    fn object_position_defaults_to_centre() {
        let image = ImageDescriptor::new("img123-800x600-jpg");
        assert_eq!(ObjectPosition::for_image(&image), ObjectPosition::default());
        assert_eq!(ObjectPosition::default().to_string(), "left 50% top 50%");
    }

    #[test]
    fn object_position_uses_hotspot_without_crop() {
        let image = ImageDescriptor::new("img123-800x600-jpg").with_hotspot(Hotspot::at(0.25, 0.75));
        let pos = ObjectPosition::for_image(&image);
        assert_eq!((pos.x, pos.y), (0.25, 0.75));
        assert_eq!(pos.to_string(), "left 25% top 75%");
    }

    #[test]
    fn object_position_translates_into_crop() {
        let image = ImageDescriptor::new("img123-800x600-jpg")
            .with_crop(Crop::new(0.25, 0.25, 0.0, 0.5))
            .with_hotspot(Hotspot::at(0.5, 0.25));
        let pos = ObjectPosition::for_image(&image);
        assert_eq!((pos.x, pos.y), (0.5, 0.5));
    }

    #[test]
    fn crop_without_hotspot_is_centred() {
        let image =
            ImageDescriptor::new("img123-800x600-jpg").with_crop(Crop::new(0.4, 0.0, 0.0, 0.0));
        assert_eq!(ObjectPosition::for_image(&image), ObjectPosition::default());
    }

    #[test]
    fn size_parses_width_by_height() {
        assert_eq!("300x200".parse::<Size>(), Ok(Size::new(300.0, 200.0)));
        assert_eq!("320.5x180".parse::<Size>(), Ok(Size::new(320.5, 180.0)));
    }

    #[test]
    fn size_rejects_malformed_input() {
        assert!("300".parse::<Size>().is_err());
        assert!("ax200".parse::<Size>().is_err());
        assert!("-1x200".parse::<Size>().is_err());
        assert!("infx200".parse::<Size>().is_err());
    }

    #[test]
    fn sizing_mode_names_match_serde() {
        for mode in [SizingMode::Inline, SizingMode::Block, SizingMode::Fill] {
            assert_eq!(
                serde_json::to_string(&mode).unwrap(),
                format!("\"{}\"", mode.as_str())
            );
        }
    }
}
