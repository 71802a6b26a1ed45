//! Shared value types passed into and out of the resolver.
//!
//! The image types deserialize directly from the CMS document shape, so a
//! caller can feed an image field from a query result straight into
//! [`resolve`](crate::resolve::resolve):
//!
//! ```json
//! {
//!   "_type": "image",
//!   "asset": { "_type": "reference", "_ref": "image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg" },
//!   "crop": { "left": 0.1, "right": 0.1, "top": 0, "bottom": 0 },
//!   "hotspot": { "x": 0.5, "y": 0.4, "width": 0.3, "height": 0.3 }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Default image CDN host.
pub const DEFAULT_CDN_URL: &str = "https://cdn.sanity.io";

/// Identifies the project and dataset an asset belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetails {
    pub project_id: String,
    pub dataset: String,
    /// CDN base URL override. `None` means [`DEFAULT_CDN_URL`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl ProjectDetails {
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// CDN base URL without trailing slashes.
    pub fn cdn_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_CDN_URL)
            .trim_end_matches('/')
    }
}

/// Reference to the stored asset document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetReference {
    #[serde(rename = "_type", default = "reference_type")]
    pub kind: String,
    #[serde(rename = "_ref")]
    pub reference: String,
}

fn reference_type() -> String {
    "reference".to_string()
}

/// Fraction of the natural image trimmed from each edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Crop {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Crop {
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Fraction of the natural width that survives the crop.
    pub fn width_fraction(&self) -> f64 {
        1.0 - (self.left + self.right)
    }

    /// Fraction of the natural height that survives the crop.
    pub fn height_fraction(&self) -> f64 {
        1.0 - (self.top + self.bottom)
    }
}

/// Focal point of the image. `x`/`y` is the centre, `width`/`height` the
/// extent of the hotspot ellipse, all as fractions of the natural image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub x: f64,
    pub y: f64,
    #[serde(default = "full_extent")]
    pub width: f64,
    #[serde(default = "full_extent")]
    pub height: f64,
}

fn full_extent() -> f64 {
    1.0
}

impl Hotspot {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            width: 1.0,
            height: 1.0,
        }
    }
}

impl Default for Hotspot {
    fn default() -> Self {
        Self::at(0.5, 0.5)
    }
}

/// One source image as stored in the CMS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    #[serde(rename = "_type", default = "image_type")]
    pub kind: String,
    pub asset: AssetReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<Crop>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotspot: Option<Hotspot>,
}

fn image_type() -> String {
    "image".to_string()
}

impl ImageDescriptor {
    /// Descriptor for an uncropped image with no hotspot.
    pub fn new(asset_reference: impl Into<String>) -> Self {
        Self {
            kind: image_type(),
            asset: AssetReference {
                kind: reference_type(),
                reference: asset_reference.into(),
            },
            crop: None,
            hotspot: None,
        }
    }

    pub fn with_crop(mut self, crop: Crop) -> Self {
        self.crop = Some(crop);
        self
    }

    pub fn with_hotspot(mut self, hotspot: Hotspot) -> Self {
        self.hotspot = Some(hotspot);
        self
    }

    pub fn asset_reference(&self) -> &str {
        &self.asset.reference
    }
}

/// A resolved variant: where to fetch it and its exact pixel size.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedImage {
    pub src: String,
    pub width: u32,
    pub height: u32,
}

impl ResolvedImage {
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_cms_image_shape() {
        let json = r#"{
            "_type": "image",
            "asset": { "_type": "reference", "_ref": "image-abc-800x600-jpg" },
            "crop": { "_type": "sanity.imageCrop", "left": 0.1, "right": 0.1, "top": 0, "bottom": 0 },
            "hotspot": { "_type": "sanity.imageHotspot", "x": 0.5, "y": 0.4, "width": 0.3, "height": 0.2 }
        }"#;
        let image: ImageDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(image.asset_reference(), "image-abc-800x600-jpg");
        assert_eq!(image.crop, Some(Crop::new(0.1, 0.1, 0.0, 0.0)));
        let hotspot = image.hotspot.unwrap();
        assert_eq!(hotspot.y, 0.4);
        assert_eq!(hotspot.height, 0.2);
    }

    #[test]
    fn hotspot_extent_defaults_to_full() {
        let hotspot: Hotspot = serde_json::from_str(r#"{"x": 0.2, "y": 0.8}"#).unwrap();
        assert_eq!(hotspot.width, 1.0);
        assert_eq!(hotspot.height, 1.0);
    }

    #[test]
    fn minimal_descriptor_has_no_crop_or_hotspot() {
        let image: ImageDescriptor =
            serde_json::from_str(r#"{"asset": {"_ref": "image-abc-10x10-png"}}"#).unwrap();
        assert_eq!(image.kind, "image");
        assert!(image.crop.is_none());
        assert!(image.hotspot.is_none());
    }

    #[test]
    fn cdn_url_strips_trailing_slashes() {
        let project = ProjectDetails::new("p1", "production").with_base_url("https://img.example//");
        assert_eq!(project.cdn_url(), "https://img.example");
        assert_eq!(ProjectDetails::new("p1", "production").cdn_url(), DEFAULT_CDN_URL);
    }

    #[test]
    fn project_details_use_camel_case_keys() {
        let project: ProjectDetails =
            serde_json::from_str(r#"{"projectId": "p1", "dataset": "production"}"#).unwrap();
        assert_eq!(project, ProjectDetails::new("p1", "production"));
    }

    #[test]
    fn resolved_aspect_ratio() {
        let resolved = ResolvedImage {
            src: String::new(),
            width: 640,
            height: 320,
        };
        assert_eq!(resolved.aspect_ratio(), 2.0);
    }
}
