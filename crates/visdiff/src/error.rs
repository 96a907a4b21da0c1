//! Comparison error types.

use std::path::PathBuf;

use thiserror::Error;

/// Failure modes of an image comparison.
///
/// None of these are retried anywhere: a comparison is a deterministic
/// function of its two inputs and fails identically until an input changes.
#[derive(Debug, Error)]
pub enum DiffError {
    /// An input image could not be read or decoded. The statistical
    /// comparison is never attempted when this happens.
    #[error("failed to load image {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The two images differ in width or height. This is a precondition
    /// violation of the comparison, not a comparison outcome.
    #[error("dimension mismatch: {reference_w}x{reference_h} vs {current_w}x{current_h}")]
    DimensionMismatch {
        reference_w: u32,
        reference_h: u32,
        current_w: u32,
        current_h: u32,
    },

    /// An input has zero area.
    #[error("empty image: {width}x{height}")]
    EmptyImage { width: u32, height: u32 },
}
