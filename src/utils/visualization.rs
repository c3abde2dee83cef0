//! Visualization of segmentation results.
//!
//! Draws the bounding boxes of a [`PageSegmentation`] over the raster it was
//! computed on, one colour per hierarchy level.
//!
//! # Examples
//!
//! ```rust,no_run
//! use inkseg::utils::visualization::{VisualizationConfig, draw_segmentation};
//! # fn demo(raster: &image::DynamicImage, page: &inkseg::domain::PageSegmentation) {
//! let overlay = draw_segmentation(raster, page, &VisualizationConfig::default());
//! overlay.save("segmented.png").unwrap();
//! # }
//! ```

use std::path::Path;

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use tracing::info;

use crate::core::errors::{SegmentationError, SegmentationResult};
use crate::domain::{PageSegmentation, Region};

/// Colours and stroke width used when drawing a segmentation.
#[derive(Debug, Clone)]
pub struct VisualizationConfig {
    pub line_color: Rgb<u8>,
    pub word_color: Rgb<u8>,
    pub character_color: Rgb<u8>,
    pub diagram_color: Rgb<u8>,
    /// Stroke width in pixels, grown outwards from the region border.
    pub thickness: u32,
    /// Skip character boxes even when the segmentation has them.
    pub draw_characters: bool,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            line_color: Rgb([0, 0, 255]),
            word_color: Rgb([0, 200, 0]),
            character_color: Rgb([255, 0, 0]),
            diagram_color: Rgb([255, 0, 255]),
            thickness: 2,
            draw_characters: true,
        }
    }
}

/// Returns an RGB copy of `raster` with every region of `page` outlined.
///
/// `page` must be expressed in the coordinates of `raster`; boxes that fall
/// outside it are clipped by the drawing routine.
pub fn draw_segmentation(
    raster: &DynamicImage,
    page: &PageSegmentation,
    config: &VisualizationConfig,
) -> RgbImage {
    let mut canvas = raster.to_rgb8();

    for line in &page.lines {
        draw_region(&mut canvas, &line.region, config.line_color, config.thickness);
        for word in &line.words {
            draw_region(&mut canvas, &word.region, config.word_color, config.thickness);
            if config.draw_characters {
                for character in word.characters() {
                    draw_region(&mut canvas, &character.region, config.character_color, 1);
                }
            }
        }
    }
    for diagram in &page.diagrams {
        draw_region(&mut canvas, &diagram.region, config.diagram_color, config.thickness);
    }

    canvas
}

/// Draws the segmentation and writes it to `output_path`.
pub fn save_segmentation(
    raster: &DynamicImage,
    page: &PageSegmentation,
    output_path: &Path,
    config: &VisualizationConfig,
) -> SegmentationResult<()> {
    draw_segmentation(raster, page, config)
        .save(output_path)
        .map_err(|e| SegmentationError::image_save(output_path.display().to_string(), e))?;
    info!("Visualization saved to: {}", output_path.display());
    Ok(())
}

fn draw_region(canvas: &mut RgbImage, region: &Region, color: Rgb<u8>, thickness: u32) {
    for t in 0..thickness.max(1) {
        let t = t as i32;
        let rect = Rect::at(region.x_min as i32 - t, region.y_min as i32 - t)
            .of_size(region.width() + 2 * t as u32, region.height() + 2 * t as u32);
        draw_hollow_rect_mut(canvas, rect, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Line, Word};
    use image::{GrayImage, Luma};

    #[test]
    fn test_draws_word_and_line_boxes() {
        let raster = DynamicImage::ImageLuma8(GrayImage::from_pixel(100, 60, Luma([255])));
        let word = Word::new(Region::new(20, 20, 39, 29, 100.0));
        let mut page = PageSegmentation::empty(100, 60, 1.0);
        page.lines.push(Line {
            region: Region::new(10, 15, 80, 35, 900.0),
            words: vec![word],
        });

        let config = VisualizationConfig {
            thickness: 1,
            ..VisualizationConfig::default()
        };
        let canvas = draw_segmentation(&raster, &page, &config);
        assert_eq!(canvas.dimensions(), (100, 60));
        assert_eq!(*canvas.get_pixel(10, 15), config.line_color);
        assert_eq!(*canvas.get_pixel(20, 25), config.word_color);
        assert_eq!(*canvas.get_pixel(50, 50), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_save_failure_reports_destination() {
        let raster = DynamicImage::ImageLuma8(GrayImage::from_pixel(10, 10, Luma([255])));
        let page = PageSegmentation::empty(10, 10, 1.0);
        let target = std::env::temp_dir()
            .join("inkseg-missing-dir")
            .join("nested")
            .join("overlay.png");
        let err = save_segmentation(&raster, &page, &target, &VisualizationConfig::default())
            .unwrap_err();
        assert!(matches!(err, SegmentationError::ImageSave { .. }));
    }
}
