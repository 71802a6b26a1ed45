//! CDN URL construction.
//!
//! Variant URLs have the shape
//!
//! ```text
//! https://cdn.sanity.io/images/<project>/<dataset>/<id>-<W>x<H>.<ext>[/<vanity>]?<params>
//! ```
//!
//! where `<W>x<H>` is always the *natural* size of the stored file. Cropping
//! and resizing are expressed purely in the query string. When an image
//! descriptor is attached, its crop and hotspot are turned into a `rect=`
//! source rectangle (see [`calculate_fit_rect`]) unless an explicit rect,
//! focal point, or [`ImageUrlBuilder::ignore_image_params`] is set.
//!
//! Query parameters are emitted in a fixed order so identical requests
//! produce byte-identical URLs and share CDN cache entries. The URL itself is
//! composed with [`url::Url`]: path segments go through `path_segments_mut`
//! and query values are percent-encoded.

use super::calculations::{calculate_crop_rect, calculate_fit_rect};
use super::params::{CropMode, FitMode, ImageFormat, Orientation, PixelRect, Quality};
use crate::asset::{ParsedAsset, parse_asset_reference};
use crate::resolve::ResolveError;
use crate::types::{Crop, Hotspot, ImageDescriptor, ProjectDetails};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::Url;

/// Builder for a single variant URL.
///
/// ```
/// # use sanity_image::imaging::ImageUrlBuilder;
/// # use sanity_image::types::{ImageDescriptor, ProjectDetails};
/// let project = ProjectDetails::new("p1", "production");
/// let image = ImageDescriptor::new("image-abc-800x600-jpg");
/// let url = ImageUrlBuilder::new(&project)
///     .image(&image)
///     .unwrap()
///     .width(400)
///     .url()
///     .unwrap();
/// assert_eq!(url, "https://cdn.sanity.io/images/p1/production/abc-800x600.jpg?w=400");
/// ```
#[derive(Debug, Clone)]
pub struct ImageUrlBuilder<'a> {
    project: &'a ProjectDetails,
    asset: Option<ParsedAsset>,
    crop: Crop,
    hotspot: Hotspot,
    width: Option<u32>,
    height: Option<u32>,
    rect: Option<PixelRect>,
    focal_point: Option<(f64, f64)>,
    background: Option<String>,
    flip_horizontal: bool,
    flip_vertical: bool,
    format: Option<ImageFormat>,
    download: Option<String>,
    blur: Option<u32>,
    sharpen: Option<u32>,
    invert: bool,
    orientation: Option<Orientation>,
    min_height: Option<u32>,
    max_height: Option<u32>,
    min_width: Option<u32>,
    max_width: Option<u32>,
    quality: Option<Quality>,
    fit: Option<FitMode>,
    crop_mode: Option<CropMode>,
    saturation: Option<i32>,
    auto_format: bool,
    dpr: Option<u32>,
    pad: Option<u32>,
    frame: Option<u32>,
    ignore_image_params: bool,
    vanity_name: Option<String>,
}

impl<'a> ImageUrlBuilder<'a> {
    pub fn new(project: &'a ProjectDetails) -> Self {
        Self {
            project,
            asset: None,
            crop: Crop::default(),
            hotspot: Hotspot::default(),
            width: None,
            height: None,
            rect: None,
            focal_point: None,
            background: None,
            flip_horizontal: false,
            flip_vertical: false,
            format: None,
            download: None,
            blur: None,
            sharpen: None,
            invert: false,
            orientation: None,
            min_height: None,
            max_height: None,
            min_width: None,
            max_width: None,
            quality: None,
            fit: None,
            crop_mode: None,
            saturation: None,
            auto_format: false,
            dpr: None,
            pad: None,
            frame: None,
            ignore_image_params: false,
            vanity_name: None,
        }
    }

    /// Attach the source image. Fails if its asset reference is malformed.
    pub fn image(mut self, image: &ImageDescriptor) -> Result<Self, ResolveError> {
        self.asset = Some(parse_asset_reference(image.asset_reference())?);
        self.crop = image.crop.unwrap_or_default();
        self.hotspot = image.hotspot.unwrap_or_default();
        Ok(self)
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn size(self, width: u32, height: u32) -> Self {
        self.width(width).height(height)
    }

    /// Explicit source rectangle. Disables crop/hotspot fitting.
    pub fn rect(mut self, rect: PixelRect) -> Self {
        self.rect = Some(rect);
        self
    }

    /// Focal point for `crop=focalpoint`. Disables crop/hotspot fitting.
    pub fn focal_point(mut self, x: f64, y: f64) -> Self {
        self.focal_point = Some((x, y));
        self
    }

    /// Background colour as hex without `#` (e.g. `fff` or `80ff0000`).
    pub fn background(mut self, color: impl Into<String>) -> Self {
        self.background = Some(color.into());
        self
    }

    pub fn flip_horizontal(mut self) -> Self {
        self.flip_horizontal = true;
        self
    }

    pub fn flip_vertical(mut self) -> Self {
        self.flip_vertical = true;
        self
    }

    pub fn format(mut self, format: ImageFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Serve as an attachment with the given filename.
    pub fn download(mut self, filename: impl Into<String>) -> Self {
        self.download = Some(filename.into());
        self
    }

    pub fn blur(mut self, amount: u32) -> Self {
        self.blur = Some(amount);
        self
    }

    pub fn sharpen(mut self, amount: u32) -> Self {
        self.sharpen = Some(amount);
        self
    }

    pub fn invert(mut self) -> Self {
        self.invert = true;
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    pub fn min_height(mut self, px: u32) -> Self {
        self.min_height = Some(px);
        self
    }

    pub fn max_height(mut self, px: u32) -> Self {
        self.max_height = Some(px);
        self
    }

    pub fn min_width(mut self, px: u32) -> Self {
        self.min_width = Some(px);
        self
    }

    pub fn max_width(mut self, px: u32) -> Self {
        self.max_width = Some(px);
        self
    }

    pub fn quality(mut self, quality: u32) -> Self {
        self.quality = Some(Quality::new(quality));
        self
    }

    pub fn fit(mut self, fit: FitMode) -> Self {
        self.fit = Some(fit);
        self
    }

    pub fn crop_mode(mut self, mode: CropMode) -> Self {
        self.crop_mode = Some(mode);
        self
    }

    /// Saturation adjustment, -100 (greyscale) to 100.
    pub fn saturation(mut self, amount: i32) -> Self {
        self.saturation = Some(amount.clamp(-100, 100));
        self
    }

    /// Let the CDN pick the best format the client accepts (`auto=format`).
    pub fn auto_format(mut self) -> Self {
        self.auto_format = true;
        self
    }

    pub fn dpr(mut self, dpr: u32) -> Self {
        self.dpr = Some(dpr);
        self
    }

    pub fn pad(mut self, px: u32) -> Self {
        self.pad = Some(px);
        self
    }

    /// First frame only, for animated sources.
    pub fn frame(mut self, frame: u32) -> Self {
        self.frame = Some(frame);
        self
    }

    /// Skip turning the image's crop and hotspot into a `rect=`.
    pub fn ignore_image_params(mut self) -> Self {
        self.ignore_image_params = true;
        self
    }

    /// SEO filename appended to the path.
    pub fn vanity_name(mut self, name: impl Into<String>) -> Self {
        self.vanity_name = Some(name.into());
        self
    }

    /// Source rectangle derived from the attached image's crop and hotspot.
    fn fitted_rect(&self, asset: &ParsedAsset) -> PixelRect {
        let natural = (asset.width, asset.height);
        let crop = calculate_crop_rect(natural, &self.crop);
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 && crop.width > 0 && crop.height > 0 => {
                calculate_fit_rect(natural, crop, &self.hotspot, w as f64 / h as f64)
            }
            _ => crop,
        }
    }

    /// Render the final URL.
    ///
    /// Path segments and query values are percent-encoded, so project ids,
    /// datasets and vanity names containing reserved characters stay inside
    /// their segment. Without an attached image only the project prefix is
    /// produced. Fails if the project's CDN base URL does not parse.
    pub fn url(&self) -> Result<String, ResolveError> {
        let base = self.project.cdn_url();
        let invalid = |reason: String| ResolveError::InvalidBaseUrl(format!("{base:?}: {reason}"));
        let mut url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| invalid("cannot hold a path".to_string()))?;
            segments.pop_if_empty().extend([
                "images",
                self.project.project_id.as_str(),
                self.project.dataset.as_str(),
            ]);
            if let Some(asset) = &self.asset {
                segments.push(&asset.filename());
                if let Some(name) = &self.vanity_name {
                    segments.push(name);
                }
            }
        }

        let Some(asset) = &self.asset else {
            return Ok(url.into());
        };

        let rect = if self.rect.is_some() {
            self.rect
        } else if self.focal_point.is_some() || self.ignore_image_params {
            None
        } else {
            Some(self.fitted_rect(asset))
        };

        let mut query = Query::default();
        query.push("rect", rect.filter(|r| !r.covers((asset.width, asset.height))));
        query.push("bg", self.background.as_deref());
        if let Some((x, y)) = self.focal_point {
            query.push("fp-x", Some(x));
            query.push("fp-y", Some(y));
        }
        let flip = match (self.flip_horizontal, self.flip_vertical) {
            (true, true) => Some("hv"),
            (true, false) => Some("h"),
            (false, true) => Some("v"),
            (false, false) => None,
        };
        query.push("flip", flip);
        query.push("w", self.width);
        query.push("h", self.height);
        query.push("fm", self.format.map(ImageFormat::as_str));
        query.push("dl", self.download.as_deref());
        query.push("blur", self.blur);
        query.push("sharpen", self.sharpen);
        query.push("invert", self.invert.then_some("true"));
        query.push("or", self.orientation.map(Orientation::degrees));
        query.push("min-h", self.min_height);
        query.push("max-h", self.max_height);
        query.push("min-w", self.min_width);
        query.push("max-w", self.max_width);
        query.push("q", self.quality.map(Quality::value));
        query.push("fit", self.fit.map(FitMode::as_str));
        query.push("crop", self.crop_mode.map(CropMode::as_str));
        query.push("sat", self.saturation);
        query.push("auto", self.auto_format.then_some("format"));
        query.push("dpr", self.dpr);
        query.push("pad", self.pad);
        query.push("frame", self.frame);

        if !query.is_empty() {
            url.set_query(Some(&query.finish()));
        }
        Ok(url.into())
    }
}

/// Query values keep the unreserved characters and the `,` separating
/// `rect=` fields; everything else is percent-encoded.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b',');

/// Ordered `name=value` pairs.
#[derive(Debug, Default)]
struct Query {
    pairs: Vec<String>,
}

impl Query {
    fn push<T: std::fmt::Display>(&mut self, name: &str, value: Option<T>) {
        if let Some(value) = value {
            let value = value.to_string();
            self.pairs
                .push(format!("{name}={}", utf8_percent_encode(&value, QUERY_VALUE)));
        }
    }

    fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn finish(&self) -> String {
        self.pairs.join("&")
    }
}
