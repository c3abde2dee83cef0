//! Size and area filters that discard spurious regions.
//!
//! Words are filtered on enclosed area, which rejects punctuation and
//! dilation specks. Characters and diagrams are filtered on bounding-box
//! width and height: diagrams come from edge maps, whose thin outlines
//! enclose little area, so box dimensions discriminate better there.

use crate::domain::region::Bounded;

/// Drops items whose `area` is below `min_area`.
pub fn filter_by_area<T: Bounded>(mut items: Vec<T>, min_area: f64) -> Vec<T> {
    items.retain(|item| item.region().area >= min_area);
    items
}

/// Keeps items whose bounding box is at least `min_width` wide AND at least
/// `min_height` tall. Both bounds are inclusive: a box of exactly
/// `min_width x min_height` is kept.
pub fn filter_by_size<T: Bounded>(mut items: Vec<T>, min_width: u32, min_height: u32) -> Vec<T> {
    items.retain(|item| {
        let region = item.region();
        region.width() >= min_width && region.height() >= min_height
    });
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Region;

    #[test]
    fn test_filter_by_area() {
        let regions = vec![
            Region::new(0, 0, 10, 10, 399.9),
            Region::new(0, 0, 10, 10, 400.0),
            Region::new(0, 0, 10, 10, 1200.0),
        ];
        let kept = filter_by_area(regions, 400.0);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| r.area >= 400.0));
    }

    #[test]
    fn test_filter_by_size_requires_both_dimensions() {
        let regions = vec![
            Region::from_xywh(0, 0, 60, 60).unwrap(),
            Region::from_xywh(0, 0, 200, 49).unwrap(),
            Region::from_xywh(0, 0, 49, 200).unwrap(),
            Region::from_xywh(0, 0, 50, 50).unwrap(),
        ];
        let kept = filter_by_size(regions, 50, 50);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| r.width() >= 50 && r.height() >= 50));
    }

    #[test]
    fn test_filter_by_size_bounds_are_inclusive() {
        let characters = vec![
            Region::from_xywh(0, 0, 5, 10).unwrap(),
            Region::from_xywh(10, 0, 4, 10).unwrap(),
            Region::from_xywh(20, 0, 5, 9).unwrap(),
        ];
        let kept = filter_by_size(characters, 5, 10);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].as_xywh(), (0, 0, 5, 10));
    }

    #[test]
    fn test_filters_preserve_order() {
        let regions = vec![
            Region::from_xywh(30, 0, 8, 12).unwrap(),
            Region::from_xywh(10, 0, 3, 12).unwrap(),
            Region::from_xywh(20, 0, 6, 14).unwrap(),
        ];
        let kept = filter_by_size(regions, 5, 10);
        let xs: Vec<u32> = kept.iter().map(|r| r.x_min).collect();
        assert_eq!(xs, vec![30, 20]);
    }
}
