//! Reading-order sorting of regions.
//!
//! Lines are read top to bottom and words and characters left to right. The
//! sort is stable, so regions sharing a coordinate keep their discovery
//! order and repeated runs over the same page produce the same sequence.

use crate::domain::region::Bounded;
use crate::processors::types::SortAxis;

/// Sorts `items` in place into reading order along `axis`.
///
/// `Vertical` sorts ascending by `y_min`, `Horizontal` ascending by `x_min`.
pub fn order_regions<T: Bounded>(items: &mut [T], axis: SortAxis) {
    match axis {
        SortAxis::Vertical => items.sort_by_key(|item| item.region().y_min),
        SortAxis::Horizontal => items.sort_by_key(|item| item.region().x_min),
    }
}

/// Returns `items` sorted into reading order along `axis`.
pub fn ordered<T: Bounded>(mut items: Vec<T>, axis: SortAxis) -> Vec<T> {
    order_regions(&mut items, axis);
    items
}

/// Whether `items` are already in reading order along `axis`.
pub fn is_ordered<T: Bounded>(items: &[T], axis: SortAxis) -> bool {
    items.windows(2).all(|pair| {
        let (a, b) = (pair[0].region(), pair[1].region());
        match axis {
            SortAxis::Vertical => a.y_min <= b.y_min,
            SortAxis::Horizontal => a.x_min <= b.x_min,
        }
    })
}
