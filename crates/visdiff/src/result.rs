//! Comparison outcomes and batch bookkeeping.

use std::path::Path;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// One metric value per color channel. Alpha never carries a metric: it
/// participates in the exact pixel equality check but not in the error
/// statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelMetrics {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Outcome of one image comparison.
///
/// `Default` is the all-zero failed state: `passed` is `false` and every
/// metric reads zero. Harnesses record it for comparisons whose inputs
/// could not be loaded, so a missing capture never counts as a pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiffResult {
    /// `true` iff no pixel differed.
    pub passed: bool,
    /// Pixels whose 8-bit RGBA values are not exactly equal.
    pub incorrect_pixels: u64,
    /// Mean squared unit-space error, averaged over the color channels and
    /// normalized by the number of sampled pixels.
    pub mse: f64,
    pub mse_channels: ChannelMetrics,
    /// Peak signal-to-noise ratio in dB; `f64::INFINITY` when the error is
    /// zero.
    pub psnr: f64,
    pub psnr_channels: ChannelMetrics,
    /// Mean structural similarity over the visited tiles, clamped to
    /// `[-1, 1]`. `1.0` means structurally identical.
    pub ssim: f64,
    /// Difference-blend visualization. Built only when pixels differ and
    /// the options ask for it; never serialized.
    #[serde(skip)]
    pub diff_image: Option<RgbaImage>,
    /// Caller-supplied label, carried through untouched.
    pub test_name: String,
    /// Capture frame number, usually parsed from the filename.
    pub frame_index: u32,
    /// Resolved path of the reference image. Filled by
    /// [`ImageDiff::compare`](crate::ImageDiff::compare).
    pub source_filename: String,
}

impl DiffResult {
    /// Result for a comparison that found no differing pixels. Similarity
    /// reads as perfect; the error metrics stay at zero and no difference
    /// image is built.
    pub(crate) fn exact_match() -> Self {
        Self {
            passed: true,
            ssim: 1.0,
            ..Self::default()
        }
    }
}

/// Pass/fail tally over a caller-owned batch of results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[DiffResult]) -> Self {
        let passed = results.iter().filter(|r| r.passed).count();
        Self {
            total: results.len(),
            passed,
            failed: results.len() - passed,
        }
    }
}

/// Frame index encoded as the trailing `_<n>` of a capture filename, e.g.
/// `"checkbox_focus_3.png"` carries frame `3`. Returns `None` when the stem
/// has no underscore or the trailing segment is not a number.
pub fn frame_index_from_filename(filename: &str) -> Option<u32> {
    let stem = Path::new(filename).file_stem()?.to_str()?;
    let (_, frame) = stem.rsplit_once('_')?;
    frame.parse().ok()
}
