//! Parameter types for variant requests.
//!
//! These describe *what* the CDN should produce. They are the interface
//! between the [`calculations`](super::calculations) (which decide sizes and
//! rectangles) and the [`url_builder`](super::url_builder) (which encodes them
//! into query parameters).
//!
//! ## Types
//!
//! - [`Quality`] — Lossy encoding quality (0–100). Clamped on construction.
//! - [`ImageFormat`] — Explicit output format (`fm=`).
//! - [`FitMode`] — How the image fits the requested box (`fit=`).
//! - [`CropMode`] — Which part to keep when `fit=crop` (`crop=`).
//! - [`PixelRect`] — Source rectangle in natural pixel coordinates (`rect=`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Quality setting for lossy encoding (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.min(100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpg,
    Pjpg,
    Png,
    Webp,
}

impl ImageFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Pjpg => "pjpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }
}

/// How the image is fitted into the requested width/height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    Clip,
    Crop,
    Fill,
    Fillmax,
    Max,
    Scale,
    Min,
}

impl FitMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clip => "clip",
            Self::Crop => "crop",
            Self::Fill => "fill",
            Self::Fillmax => "fillmax",
            Self::Max => "max",
            Self::Scale => "scale",
            Self::Min => "min",
        }
    }
}

/// Anchor used when `fit=crop` must discard part of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropMode {
    Top,
    Bottom,
    Left,
    Right,
    Center,
    Focalpoint,
    Entropy,
}

impl CropMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
            Self::Focalpoint => "focalpoint",
            Self::Entropy => "entropy",
        }
    }
}

/// Clockwise rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Orientation {
    pub fn degrees(self) -> u32 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }
}

/// Rectangle in natural pixel coordinates of the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Whether this rectangle covers the whole `(width, height)` image.
    pub fn covers(&self, natural: (u32, u32)) -> bool {
        self.left == 0 && self.top == 0 && self.width == natural.0 && self.height == natural.1
    }
}

impl fmt::Display for PixelRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.left, self.top, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 0);
        assert_eq!(Quality::new(75).value(), 75);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn rect_display_is_comma_separated() {
        assert_eq!(PixelRect::new(100, 0, 600, 600).to_string(), "100,0,600,600");
    }

    #[test]
    fn rect_covers_only_full_image() {
        assert!(PixelRect::new(0, 0, 800, 600).covers((800, 600)));
        assert!(!PixelRect::new(1, 0, 799, 600).covers((800, 600)));
        assert!(!PixelRect::new(0, 0, 800, 599).covers((800, 600)));
    }

    #[test]
    fn fit_mode_deserializes_lowercase() {
        let fit: FitMode = serde_json::from_str(r#""fillmax""#).unwrap();
        assert_eq!(fit, FitMode::Fillmax);
        assert_eq!(fit.as_str(), "fillmax");
    }
}
