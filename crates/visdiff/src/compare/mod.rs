//! Statistical comparison of two same-sized images.
//!
//! Comparison runs in two phases. Byte-identical buffers short-circuit to
//! an exact match without touching a single pixel. Otherwise one pass walks
//! the images tile by tile, counting exactly-differing pixels, summing
//! squared channel error and estimating structural similarity per tile;
//! MSE, PSNR and the mean SSIM fall out of the totals at the end.

mod stats;
pub mod visual;

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::color;
use crate::error::DiffError;
use crate::result::{ChannelMetrics, DiffResult};
use stats::{BlockStats, DiffTotals};

/// Edge length of the square tile over which SSIM is estimated.
pub const TILE_SIZE: u32 = 8;

/// Knobs for a single comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareOptions {
    /// Also visit the clipped tiles along the right and bottom edges when
    /// the dimensions are not multiples of [`TILE_SIZE`]. Off by default:
    /// the remainder strip then contributes to no metric, and two images
    /// differing only there compare as equal.
    #[serde(default)]
    pub full_coverage: bool,
    /// Build the difference visualization when pixels differ. Costs one
    /// extra full-image pass plus the output allocation.
    #[serde(default = "default_build_diff_image")]
    pub build_diff_image: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            full_coverage: false,
            build_diff_image: true,
        }
    }
}

fn default_build_diff_image() -> bool {
    true
}

/// Compare two loaded images and derive the full set of metrics.
///
/// The images must agree in width and height and have nonzero area; there
/// is no resampling here. Equality is exact: a pixel counts as incorrect
/// when any of its four 8-bit channels differs. With default options only
/// whole tiles are visited, so images smaller than one tile compare as
/// equal vacuously.
pub fn compare_images(
    reference: &RgbaImage,
    current: &RgbaImage,
    options: CompareOptions,
) -> Result<DiffResult, DiffError> {
    if reference.dimensions() != current.dimensions() {
        return Err(DiffError::DimensionMismatch {
            reference_w: reference.width(),
            reference_h: reference.height(),
            current_w: current.width(),
            current_h: current.height(),
        });
    }

    let (width, height) = reference.dimensions();
    if width == 0 || height == 0 {
        return Err(DiffError::EmptyImage { width, height });
    }

    // Phase 1: byte-identical buffers need no pixel arithmetic.
    if reference.as_raw() == current.as_raw() {
        return Ok(DiffResult::exact_match());
    }

    // Phase 2: tile pass.
    let tiles_x = tile_count(width, options.full_coverage);
    let tiles_y = tile_count(height, options.full_coverage);
    let mut totals = DiffTotals::default();

    for tile_y in 0..tiles_y {
        for tile_x in 0..tiles_x {
            let mut block = BlockStats::default();

            for dy in 0..TILE_SIZE {
                let y = tile_y * TILE_SIZE + dy;
                if y >= height {
                    break;
                }
                for dx in 0..TILE_SIZE {
                    let x = tile_x * TILE_SIZE + dx;
                    if x >= width {
                        break;
                    }

                    let a = *reference.get_pixel(x, y);
                    let b = *current.get_pixel(x, y);

                    if a != b {
                        totals.record_mismatch(color::squared_diff_rgb(a, b));
                    }
                    block.push(color::luminance(a), color::luminance(b));
                }
            }

            totals.fold_tile(block);
        }
    }

    trace!(
        tiles = totals.tiles,
        sampled_pixels = totals.sampled_pixels,
        incorrect_pixels = totals.incorrect_pixels,
        "tile pass finished"
    );

    if totals.incorrect_pixels == 0 {
        return Ok(DiffResult::exact_match());
    }

    let mut result = derive_metrics(&totals);
    if options.build_diff_image {
        result.diff_image = Some(visual::difference_image(reference, current));
    }
    Ok(result)
}

fn tile_count(extent: u32, full_coverage: bool) -> u32 {
    if full_coverage {
        extent.div_ceil(TILE_SIZE)
    } else {
        extent / TILE_SIZE
    }
}

/// Turn the accumulated totals of a mismatching comparison into metrics.
/// Callers guarantee at least one sampled pixel and one folded tile.
fn derive_metrics(totals: &DiffTotals) -> DiffResult {
    let sampled = totals.sampled_pixels as f64;
    let mse_channels = ChannelMetrics {
        r: totals.disparity[0] / sampled,
        g: totals.disparity[1] / sampled,
        b: totals.disparity[2] / sampled,
    };
    let mse = (mse_channels.r + mse_channels.g + mse_channels.b) / 3.0;

    DiffResult {
        passed: false,
        incorrect_pixels: totals.incorrect_pixels,
        mse,
        mse_channels,
        psnr: psnr(mse),
        psnr_channels: ChannelMetrics {
            r: psnr(mse_channels.r),
            g: psnr(mse_channels.g),
            b: psnr(mse_channels.b),
        },
        ssim: (totals.ssim_sum / totals.tiles as f64).clamp(-1.0, 1.0),
        ..DiffResult::default()
    }
}

/// Peak signal-to-noise ratio in dB for a mean squared error in unit
/// dynamic range: `20 * log10(1 / sqrt(mse))`. Zero error maps to
/// `f64::INFINITY`.
pub fn psnr(mse: f64) -> f64 {
    if mse == 0.0 {
        f64::INFINITY
    } else {
        20.0 * (1.0 / mse.sqrt()).log10()
    }
}
