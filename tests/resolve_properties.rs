//! Properties of the resolver checked through the public API.
//!
//! Run with: cargo test --test resolve_properties

use sanity_image::batch::{parse_batch, resolve_batch};
use sanity_image::cache::ResolveCache;
use sanity_image::resolve::{ResolveError, resolve};
use sanity_image::types::{Crop, Hotspot, ImageDescriptor, ProjectDetails};

const NATURAL_SIZES: &[(u32, u32)] = &[(800, 600), (600, 800), (1920, 1080), (1000, 1000), (37, 913)];
const RATIOS: &[f64] = &[0.25, 0.5, 0.8, 1.0, 4.0 / 3.0, 16.0 / 9.0, 3.0];
const CROPS: &[(f64, f64, f64, f64)] = &[
    (0.0, 0.0, 0.0, 0.0),
    (0.1, 0.1, 0.0, 0.0),
    (0.0, 0.0, 0.25, 0.25),
    (0.05, 0.3, 0.12, 0.01),
];

fn project() -> ProjectDetails {
    ProjectDetails::new("p1", "production")
}

fn reference(w: u32, h: u32) -> String {
    format!("image-abc123-{w}x{h}-jpg")
}

#[test]
fn uncropped_resolves_to_natural_size() {
    for &(w, h) in NATURAL_SIZES {
        let r = resolve(&project(), &ImageDescriptor::new(reference(w, h)), None).unwrap();
        assert_eq!((r.width, r.height), (w, h));
    }
}

#[test]
fn crop_scales_each_axis() {
    for &(w, h) in NATURAL_SIZES {
        for &(l, r, t, b) in CROPS {
            let image = ImageDescriptor::new(reference(w, h)).with_crop(Crop::new(l, r, t, b));
            let resolved = resolve(&project(), &image, None).unwrap();
            assert_eq!(resolved.width, (w as f64 * (1.0 - (l + r))).round() as u32);
            assert_eq!(resolved.height, (h as f64 * (1.0 - (t + b))).round() as u32);
            assert!(resolved.width >= 1 && resolved.height >= 1);
        }
    }
}

#[test]
fn aspect_fit_matches_ratio_and_stays_inside_crop() {
    for &(w, h) in NATURAL_SIZES {
        for &(l, r, t, b) in CROPS {
            let image = ImageDescriptor::new(reference(w, h)).with_crop(Crop::new(l, r, t, b));
            let cropped = resolve(&project(), &image, None).unwrap();
            for &ratio in RATIOS {
                let Ok(fitted) = resolve(&project(), &image, Some(ratio)) else {
                    // tiny images can round an axis to zero
                    continue;
                };
                assert!(fitted.width <= cropped.width);
                assert!(fitted.height <= cropped.height);
                // one axis is kept, the other is within rounding of the ratio
                if fitted.width == cropped.width {
                    let expected = (fitted.width as f64 / ratio).round() as u32;
                    assert!(fitted.height == expected || fitted.height == cropped.height);
                } else {
                    assert_eq!(fitted.height, cropped.height);
                    assert_eq!(fitted.width, (cropped.height as f64 * ratio).round() as u32);
                }
            }
        }
    }
}

#[test]
fn zero_crop_behaves_like_no_crop() {
    for &(w, h) in NATURAL_SIZES {
        let plain = ImageDescriptor::new(reference(w, h));
        let zero = plain.clone().with_crop(Crop::default());
        for &ratio in RATIOS {
            assert_eq!(
                resolve(&project(), &plain, Some(ratio)),
                resolve(&project(), &zero, Some(ratio))
            );
        }
    }
}

#[test]
fn resolve_is_idempotent() {
    let image = ImageDescriptor::new(reference(1920, 1080))
        .with_crop(Crop::new(0.05, 0.3, 0.12, 0.01))
        .with_hotspot(Hotspot::at(0.4, 0.6));
    assert_eq!(
        resolve(&project(), &image, Some(0.8)),
        resolve(&project(), &image, Some(0.8))
    );
}

#[test]
fn documented_examples() {
    let image = ImageDescriptor::new("img123-800x600-jpg");
    let square = resolve(&project(), &image, Some(1.0)).unwrap();
    assert_eq!((square.width, square.height), (600, 600));
    assert!(square.src.starts_with("https://cdn.sanity.io/images/p1/production/img123-800x600.jpg?"));
    assert!(square.src.ends_with("&w=600&h=600"));

    let cropped = image.with_crop(Crop::new(0.1, 0.1, 0.0, 0.0));
    let r = resolve(&project(), &cropped, None).unwrap();
    assert_eq!((r.width, r.height), (640, 600));
    let r = resolve(&project(), &cropped, Some(2.0)).unwrap();
    assert_eq!((r.width, r.height), (640, 320));
}

#[test]
fn malformed_reference_error() {
    let err = resolve(&project(), &ImageDescriptor::new("abc-notasize-jpg"), None).unwrap_err();
    assert!(matches!(err, ResolveError::MalformedAssetReference(_)));
    assert!(err.to_string().contains("abc-notasize-jpg"));
}

#[test]
fn cms_json_through_batch_and_cache() {
    let entries = parse_batch(
        r#"[
            {
                "_type": "image",
                "asset": {"_type": "reference", "_ref": "image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg"},
                "crop": {"_type": "sanity.imageCrop", "left": 0, "right": 0, "top": 0.1, "bottom": 0.1},
                "hotspot": {"_type": "sanity.imageHotspot", "x": 0.5, "y": 0.5, "width": 0.4, "height": 0.4},
                "aspectRatio": 1.0
            },
            {"asset": {"_ref": "image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg"}}
        ]"#,
    )
    .unwrap();
    let cache = ResolveCache::new();
    let results = resolve_batch(&project(), &entries, None, &cache);

    let square = results[0].outcome.as_ref().unwrap();
    assert_eq!((square.width, square.height), (2000, 2000));
    assert_eq!(
        square.src,
        "https://cdn.sanity.io/images/p1/production/Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000.jpg?rect=0,500,2000,2000&w=2000&h=2000"
    );

    let natural = results[1].outcome.as_ref().unwrap();
    assert_eq!((natural.width, natural.height), (2000, 3000));
    assert_eq!(cache.len(), 2);
}

#[test]
fn reserved_characters_in_dataset_keep_the_query_intact() {
    let project = ProjectDetails::new("p1", "prod#staging");
    let r = resolve(&project, &ImageDescriptor::new("img123-800x600-jpg"), Some(1.0)).unwrap();
    let parsed = url::Url::parse(&r.src).unwrap();
    assert_eq!(parsed.fragment(), None);
    assert_eq!(parsed.query(), Some("rect=100,0,600,600&w=600&h=600"));
    assert_eq!(parsed.path(), "/images/p1/prod%23staging/img123-800x600.jpg");
}
