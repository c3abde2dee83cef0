//! Utility functions for loading page rasters and cutting regions out of them.
//!
//! Regions never carry pixels; whenever a pass or a classifier needs the
//! content of a region it is cropped from the page raster here.

use std::path::Path;

use image::DynamicImage;

use crate::core::errors::{SegmentationError, SegmentationResult};
use crate::domain::Region;

/// Loads a page raster from disk.
///
/// # Arguments
///
/// * `path` - Path of any image format supported by the `image` crate
///
/// # Errors
///
/// Returns `SegmentationError::ImageLoad` if the file cannot be opened or
/// decoded, and `InvalidInput` if the decoded raster is empty.
pub fn load_image(path: impl AsRef<Path>) -> SegmentationResult<DynamicImage> {
    let raster = image::open(path.as_ref()).map_err(SegmentationError::ImageLoad)?;
    if raster.width() == 0 || raster.height() == 0 {
        return Err(SegmentationError::invalid_input(format!(
            "{} decoded to an empty raster",
            path.as_ref().display()
        )));
    }
    Ok(raster)
}

/// Copies the pixels of `region` out of `raster`.
///
/// The crop keeps the raster's pixel format.
///
/// # Errors
///
/// Returns `InvalidInput` if the region does not lie inside the raster.
pub fn crop_region(raster: &DynamicImage, region: &Region) -> SegmentationResult<DynamicImage> {
    if !region.fits_within(raster.width(), raster.height()) {
        return Err(SegmentationError::invalid_input(format!(
            "region {:?} exceeds raster of {}x{}",
            region.as_xywh(),
            raster.width(),
            raster.height()
        )));
    }
    let (x, y, w, h) = region.as_xywh();
    Ok(raster.crop_imm(x, y, w, h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn test_crop_region_copies_pixels() {
        let gray = GrayImage::from_fn(20, 10, |x, y| Luma([(x + y * 20) as u8]));
        let raster = DynamicImage::ImageLuma8(gray);
        let crop = crop_region(&raster, &Region::new(2, 3, 5, 4, 0.0)).unwrap();
        assert_eq!((crop.width(), crop.height()), (4, 2));
        assert_eq!(crop.as_luma8().unwrap().get_pixel(0, 0)[0], 62);
    }

    #[test]
    fn test_crop_region_out_of_bounds() {
        let raster = DynamicImage::ImageLuma8(GrayImage::new(10, 10));
        let err = crop_region(&raster, &Region::new(5, 5, 10, 8, 0.0)).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_image("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, SegmentationError::ImageLoad(_)));
    }
}
