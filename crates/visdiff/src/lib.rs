//! Image differential comparison for visual regression testing.
//!
//! Two same-sized RGBA images go in; out comes an exact incorrect-pixel
//! count, mean squared error and peak signal-to-noise ratio overall and per
//! color channel, a block-wise structural similarity score, and optionally
//! a per-pixel difference visualization.
//!
//! [`ImageDiff`] is the usual entry point: it binds a reference and a
//! current directory tree and resolves both against a relative filename per
//! comparison. [`compare_images`] does the same work on already-loaded
//! buffers, and [`difference_image`] builds just the visualization.
//!
//! ```no_run
//! use visdiff::ImageDiff;
//!
//! # fn main() -> Result<(), visdiff::DiffError> {
//! let diff = ImageDiff::new("snapshots/reference", "snapshots/current");
//! let result = diff.compare("main_menu_1.png")?;
//! if !result.passed {
//!     println!("{} pixels differ, ssim {:.4}", result.incorrect_pixels, result.ssim);
//! }
//! # Ok(())
//! # }
//! ```

pub mod color;
pub mod compare;
mod diff;
mod error;
mod result;

pub use compare::visual::difference_image;
pub use compare::{CompareOptions, TILE_SIZE, compare_images};
pub use diff::ImageDiff;
pub use error::DiffError;
pub use result::{BatchSummary, ChannelMetrics, DiffResult, frame_index_from_filename};
