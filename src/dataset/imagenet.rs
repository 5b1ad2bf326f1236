//! ImageNet validation images: naming, batch planning and batch loading.

use std::path::{Path, PathBuf};

use image::ImageReader;
use tracing::debug;

use super::preprocess::preprocess;
use crate::utils::error::{Error, Result};

/// File name of a validation image by zero-based position.
///
/// Positions are 1-indexed on disk: position 0 maps to
/// `ILSVRC2012_val_00000001.JPEG`.
pub fn val_file_name(index: usize) -> String {
    format!("ILSVRC2012_val_000{:05}.JPEG", index + 1)
}

/// Half-open index range of one batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    pub start: usize,
    pub end: usize,
}

impl BatchPlan {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Number of batches needed for `num_images` at `max_batch_size`
pub fn batch_count(num_images: usize, max_batch_size: usize) -> usize {
    num_images.div_ceil(max_batch_size)
}

/// Partition `[0, num_images)` into consecutive chunks of `max_batch_size`.
/// The last chunk may be shorter.
pub fn plan_batches(num_images: usize, max_batch_size: usize) -> Vec<BatchPlan> {
    let mut plans = Vec::with_capacity(batch_count(num_images, max_batch_size));
    let mut start = 0;

    while start < num_images {
        let end = (start + max_batch_size).min(num_images);
        plans.push(BatchPlan { start, end });
        start = end;
    }

    plans
}

/// A directory of numbered validation images
#[derive(Debug, Clone)]
pub struct ValImages {
    dir: PathBuf,
}

impl ValImages {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the image at a zero-based position
    pub fn file_path(&self, index: usize) -> PathBuf {
        self.dir.join(val_file_name(index))
    }

    /// Decode and preprocess every image of one batch.
    ///
    /// Returns the file names and the preprocessed CHW tensors in batch
    /// order. A missing or undecodable image aborts the whole run.
    pub fn load_batch(&self, plan: BatchPlan) -> Result<(Vec<String>, Vec<Vec<f32>>)> {
        let mut file_names = Vec::with_capacity(plan.len());
        let mut pre_batch = Vec::with_capacity(plan.len());

        for index in plan.start..plan.end {
            let file_name = val_file_name(index);
            let path = self.dir.join(&file_name);
            debug!("Loading {}", path.display());

            let decoded = ImageReader::open(&path)
                .map_err(|e| Error::Image(format!("{}: {}", path.display(), e)))?
                .decode()
                .map_err(|e| Error::Image(format!("{}: {}", path.display(), e)))?;

            pre_batch.push(preprocess(&decoded));
            file_names.push(file_name);
        }

        Ok((file_names, pre_batch))
    }
}
