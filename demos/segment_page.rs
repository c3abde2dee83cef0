//! Page Segmentation Example
//!
//! Segments one or more handwritten page images into lines, words, optional
//! characters and diagrams, and prints the result as JSON.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example segment_page -- [OPTIONS] <IMAGES>...
//! ```
//!
//! # Arguments
//!
//! * `-c, --config` - JSON configuration file (partial documents are fine)
//! * `--characters` - Run the character pass
//! * `--source-coordinates` - Report regions in the submitted image's resolution
//! * `--threads` - Size of a dedicated thread pool
//! * `-o, --output-dir` - Directory for visualizations (feature `visualization`)
//! * `<IMAGES>...` - Page images to segment
//!
//! # Example
//!
//! ```bash
//! RUST_LOG=inkseg=debug cargo run --example segment_page --features visualization -- \
//!     --characters -o output/ page1.jpg page2.png
//! ```

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use inkseg::prelude::*;
use inkseg::utils::init_tracing;
use serde_json::json;
use tracing::{error, info};

/// Command-line arguments for the segmentation example
#[derive(Parser)]
#[command(name = "segment_page")]
#[command(about = "Segments handwritten pages into lines, words, characters and diagrams")]
struct Args {
    /// Page images to segment
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run the character pass inside every word
    #[arg(long)]
    characters: bool,

    /// Report regions in the submitted image's resolution instead of the normalized one
    #[arg(long)]
    source_coordinates: bool,

    /// Number of worker threads (defaults to rayon's global pool)
    #[arg(long)]
    threads: Option<usize>,

    /// Directory to save visualizations to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SegmentationConfig::from_json_str(&fs::read_to_string(path)?)?,
        None => SegmentationConfig::default(),
    };
    if args.characters {
        config = config.with_character_pass(true);
    }
    if args.threads.is_some() {
        let parallel = config.parallel.clone().with_max_threads(args.threads);
        config = config.with_parallel(parallel);
    }

    let segmenter = PageSegmenter::new(config)?;
    if let Some(dir) = &args.output_dir {
        fs::create_dir_all(dir)?;
    }

    let mut results = Vec::with_capacity(args.images.len());
    for path in &args.images {
        let raster = match load_image(path) {
            Ok(raster) => raster,
            Err(err) => {
                error!("Failed to load {}: {err}", path.display());
                continue;
            }
        };

        let start = Instant::now();
        let page = segmenter.segment_page(&raster)?;
        info!(
            "{}: {} lines, {} words, {} characters, {} diagrams in {:.2?}",
            path.display(),
            page.line_count(),
            page.word_count(),
            page.character_count(),
            page.diagrams.len(),
            start.elapsed()
        );

        if let Some(dir) = &args.output_dir {
            save_visualization(&segmenter, &raster, &page, path, dir)?;
        }

        let page = if args.source_coordinates {
            page.to_source_coordinates(raster.width(), raster.height())
        } else {
            page
        };
        results.push(json!({
            "image": path.display().to_string(),
            "segmentation": page,
        }));
    }

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

#[cfg(feature = "visualization")]
fn save_visualization(
    segmenter: &PageSegmenter,
    raster: &image::DynamicImage,
    page: &PageSegmentation,
    path: &std::path::Path,
    dir: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    use inkseg::utils::visualization::{VisualizationConfig, save_segmentation};

    let normalized = segmenter.normalize(raster)?;
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("page");
    let output = dir.join(format!("{stem}_segmented.png"));
    save_segmentation(&normalized.image, page, &output, &VisualizationConfig::default())?;
    Ok(())
}

#[cfg(not(feature = "visualization"))]
fn save_visualization(
    _segmenter: &PageSegmenter,
    _raster: &image::DynamicImage,
    _page: &PageSegmentation,
    path: &std::path::Path,
    _dir: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::warn!(
        "Skipping visualization of {}: build with --features visualization",
        path.display()
    );
    Ok(())
}
