//! Outer-contour extraction from binary masks.
//!
//! Components are traced with `imageproc`'s border follower (8-connected).
//! Only outermost boundaries are reported: holes, and blobs sitting inside
//! another blob's hole, are skipped. Nothing is filtered by size here.
//!
//! The follower treats the image frame as foreground context, so a blob
//! touching column 0 comes back as a parentless hole. Tracing runs on a copy
//! framed by one background pixel, which keeps every border blob an outer
//! contour, and points are shifted back afterwards.

use image::{GrayImage, imageops};
use imageproc::contours::{BorderType, Contour, find_contours};

use crate::domain::Region;
use crate::processors::binarize::BinaryMask;

/// Finds the outermost foreground components of `mask`.
///
/// Each component becomes a [`Region`] holding its inclusive bounding box and
/// the area enclosed by its traced outer boundary (shoelace formula over the
/// boundary pixel centres). A one-pixel-wide stroke therefore encloses zero
/// area, and a filled `w x h` rectangle encloses `(w - 1) * (h - 1)`.
///
/// Regions are returned in discovery order, which is raster order of each
/// component's first boundary pixel. Components touching the mask border are
/// included.
pub fn extract_contours(mask: &BinaryMask) -> Vec<Region> {
    let (width, height) = mask.dimensions();
    if width == 0 || height == 0 || mask.is_blank() {
        return Vec::new();
    }

    let mut framed = GrayImage::new(width + 2, height + 2);
    imageops::replace(&mut framed, mask.as_image(), 1, 1);

    find_contours::<u32>(&framed)
        .iter()
        .filter(|contour| {
            matches!(contour.border_type, BorderType::Outer) && contour.parent.is_none()
        })
        .filter_map(unframed_region)
        .collect()
}

/// Bounding box, in unframed coordinates, and enclosed area of one contour
/// traced on the framed mask.
fn unframed_region(contour: &Contour<u32>) -> Option<Region> {
    let first = contour.points.first()?;
    let (mut x_min, mut y_min, mut x_max, mut y_max) = (first.x, first.y, first.x, first.y);
    for p in &contour.points {
        x_min = x_min.min(p.x);
        y_min = y_min.min(p.y);
        x_max = x_max.max(p.x);
        y_max = y_max.max(p.y);
    }

    // Foreground never lands on the frame, so every coordinate is at least 1.
    Some(Region::new(
        x_min - 1,
        y_min - 1,
        x_max - 1,
        y_max - 1,
        enclosed_area(contour),
    ))
}

/// Shoelace area of the closed polygon through the contour points.
fn enclosed_area(contour: &Contour<u32>) -> f64 {
    let points = &contour.points;
    if points.len() < 3 {
        return 0.0;
    }

    let n = points.len();
    let twice_area: i64 = (0..n)
        .map(|i| {
            let (a, b) = (&points[i], &points[(i + 1) % n]);
            i64::from(a.x) * i64::from(b.y) - i64::from(b.x) * i64::from(a.y)
        })
        .sum();
    twice_area.unsigned_abs() as f64 / 2.0
}
