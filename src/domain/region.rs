//! Axis-aligned region descriptors.

use serde::{Deserialize, Serialize};

/// An axis-aligned region of the page in integer pixel coordinates.
///
/// Both corners are inclusive: a region covering a single pixel has
/// `x_min == x_max` and `y_min == y_max`. `area` is the measure the region
/// was filtered on; for contour-derived regions it is the area enclosed by
/// the outer boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x_min: u32,
    pub y_min: u32,
    pub x_max: u32,
    pub y_max: u32,
    pub area: f64,
}

impl Region {
    /// Creates a region from inclusive corner coordinates.
    ///
    /// Corners given in the wrong order are swapped so that
    /// `x_min <= x_max` and `y_min <= y_max` always hold.
    pub fn new(x_min: u32, y_min: u32, x_max: u32, y_max: u32, area: f64) -> Self {
        Self {
            x_min: x_min.min(x_max),
            y_min: y_min.min(y_max),
            x_max: x_min.max(x_max),
            y_max: y_min.max(y_max),
            area,
        }
    }

    /// Creates a region from `x, y, width, height`, using the box area as `area`.
    ///
    /// Returns `None` for an empty box.
    pub fn from_xywh(x: u32, y: u32, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            x_min: x,
            y_min: y,
            x_max: x + width - 1,
            y_max: y + height - 1,
            area: f64::from(width) * f64::from(height),
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.x_max - self.x_min + 1
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.y_max - self.y_min + 1
    }

    /// Area of the bounding box, independent of `area`.
    pub fn bbox_area(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    /// Returns `(x, y, width, height)`.
    pub fn as_xywh(&self) -> (u32, u32, u32, u32) {
        (self.x_min, self.y_min, self.width(), self.height())
    }

    /// Whether `other` lies entirely inside this region.
    pub fn contains(&self, other: &Region) -> bool {
        other.x_min >= self.x_min
            && other.y_min >= self.y_min
            && other.x_max <= self.x_max
            && other.y_max <= self.y_max
    }

    /// Whether the region fits inside a raster of the given size.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x_max < width && self.y_max < height
    }

    /// Moves the region by a non-negative offset, typically the origin of the
    /// crop it was detected in.
    pub fn translate(&self, dx: u32, dy: u32) -> Self {
        Self {
            x_min: self.x_min + dx,
            y_min: self.y_min + dy,
            x_max: self.x_max + dx,
            y_max: self.y_max + dy,
            area: self.area,
        }
    }

    /// Grows the region by `dx` columns and `dy` rows on every side, clamped
    /// to a `width x height` raster.
    pub fn expand(&self, dx: u32, dy: u32, width: u32, height: u32) -> Self {
        Self {
            x_min: self.x_min.saturating_sub(dx),
            y_min: self.y_min.saturating_sub(dy),
            x_max: (self.x_max + dx).min(width.saturating_sub(1)),
            y_max: (self.y_max + dy).min(height.saturating_sub(1)),
            area: self.area,
        }
    }

    /// Maps the region through a uniform scale `factor`, clamped to a
    /// `width x height` raster.
    ///
    /// The pixel span `[x_min, x_max + 1)` is scaled and rounded outwards so
    /// the mapped region never loses ink at its border. `area` scales with the
    /// square of the factor.
    pub fn scale(&self, factor: f64, width: u32, height: u32) -> Self {
        let map_min = |v: u32, limit: u32| -> u32 {
            ((f64::from(v) * factor).floor() as u32).min(limit.saturating_sub(1))
        };
        let map_max = |v: u32, limit: u32| -> u32 {
            let end = (f64::from(v + 1) * factor).ceil() as u32;
            end.saturating_sub(1).min(limit.saturating_sub(1))
        };

        Self::new(
            map_min(self.x_min, width),
            map_min(self.y_min, height),
            map_max(self.x_max, width),
            map_max(self.y_max, height),
            self.area * factor * factor,
        )
    }
}

/// Anything that occupies a [`Region`] of the page.
///
/// Lets the ordering and filtering steps work on bare regions as well as on
/// lines, words, characters and diagrams.
pub trait Bounded {
    fn region(&self) -> &Region;
}

impl Bounded for Region {
    fn region(&self) -> &Region {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_dimensions_are_inclusive() {
        let region = Region::new(10, 20, 19, 24, 0.0);
        assert_eq!(region.width(), 10);
        assert_eq!(region.height(), 5);
        assert_eq!(region.bbox_area(), 50);
        assert_eq!(region.as_xywh(), (10, 20, 10, 5));
    }

    #[test]
    fn test_region_new_orders_corners() {
        let region = Region::new(30, 40, 10, 5, 1.0);
        assert_eq!((region.x_min, region.y_min), (10, 5));
        assert_eq!((region.x_max, region.y_max), (30, 40));
    }

    #[test]
    fn test_from_xywh() {
        assert!(Region::from_xywh(0, 0, 0, 5).is_none());
        let region = Region::from_xywh(5, 6, 3, 4).unwrap();
        assert_eq!((region.x_max, region.y_max), (7, 9));
        assert_eq!(region.area, 12.0);
    }

    #[test]
    fn test_translate_and_contains() {
        let line = Region::new(100, 50, 400, 80, 0.0);
        let word = Region::new(5, 2, 60, 25, 300.0).translate(100, 50);
        assert_eq!(word.x_min, 105);
        assert_eq!(word.y_max, 75);
        assert_eq!(word.area, 300.0);
        assert!(line.contains(&word));
        assert!(!word.contains(&line));
    }

    #[test]
    fn test_expand_clamps_to_raster() {
        let region = Region::new(2, 3, 97, 48, 0.0);
        let expanded = region.expand(5, 5, 100, 50);
        assert_eq!(expanded, Region::new(0, 0, 99, 49, 0.0));
    }

    #[test]
    fn test_scale_rounds_outwards() {
        let region = Region::new(10, 10, 19, 19, 100.0);
        let scaled = region.scale(1.5, 1000, 1000);
        assert_eq!(scaled.x_min, 15);
        assert_eq!(scaled.x_max, 29);
        assert_eq!(scaled.area, 225.0);

        let clamped = region.scale(10.0, 150, 150);
        assert_eq!(clamped.x_max, 149);
    }
}
