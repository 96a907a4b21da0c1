//! Directory-pair facade for comparing captures on disk.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use tracing::{debug, error};

use crate::compare::{self, CompareOptions};
use crate::error::DiffError;
use crate::result::DiffResult;

/// Compares same-named captures from two directory trees.
///
/// Both roots are bound at construction and every [`compare`] call
/// re-resolves them against a relative filename, so one value can serve a
/// whole run of comparisons. The facade holds no other state; `&self`
/// methods are safe to call from multiple threads at once.
///
/// [`compare`]: ImageDiff::compare
#[derive(Debug, Clone)]
pub struct ImageDiff {
    reference_dir: PathBuf,
    current_dir: PathBuf,
    options: CompareOptions,
}

impl ImageDiff {
    /// Bind a reference and a current directory with default options.
    pub fn new(reference_dir: impl Into<PathBuf>, current_dir: impl Into<PathBuf>) -> Self {
        Self::with_options(reference_dir, current_dir, CompareOptions::default())
    }

    pub fn with_options(
        reference_dir: impl Into<PathBuf>,
        current_dir: impl Into<PathBuf>,
        options: CompareOptions,
    ) -> Self {
        Self {
            reference_dir: reference_dir.into(),
            current_dir: current_dir.into(),
            options,
        }
    }

    pub fn reference_dir(&self) -> &Path {
        &self.reference_dir
    }

    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    pub fn options(&self) -> &CompareOptions {
        &self.options
    }

    /// Compare the capture named `filename` under both roots.
    ///
    /// On success the result's `source_filename` holds the resolved
    /// reference path.
    pub fn compare(&self, filename: &str) -> Result<DiffResult, DiffError> {
        let reference = self.reference_dir.join(filename);
        let current = self.current_dir.join(filename);

        let mut result = self.compare_files(&reference, &current)?;
        result.source_filename = reference.to_string_lossy().into_owned();
        Ok(result)
    }

    /// Compare two explicit image files.
    ///
    /// Either image failing to load is a [`DiffError::Load`]; no pixel is
    /// compared in that case. Harnesses that need a result row for the
    /// failed entry record [`DiffResult::default`].
    pub fn compare_files(
        &self,
        reference_path: impl AsRef<Path>,
        current_path: impl AsRef<Path>,
    ) -> Result<DiffResult, DiffError> {
        let reference = load_image(reference_path.as_ref())?;
        let current = load_image(current_path.as_ref())?;

        let result = compare::compare_images(&reference, &current, self.options)?;
        debug!(
            reference = %reference_path.as_ref().display(),
            current = %current_path.as_ref().display(),
            passed = result.passed,
            incorrect_pixels = result.incorrect_pixels,
            "comparison finished"
        );
        Ok(result)
    }
}

fn load_image(path: &Path) -> Result<RgbaImage, DiffError> {
    match image::open(path) {
        Ok(img) => Ok(img.to_rgba8()),
        Err(source) => {
            error!(path = %path.display(), %source, "failed to load image");
            Err(DiffError::Load {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}
