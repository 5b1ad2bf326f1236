//! Validation-set access and input preprocessing.

pub mod imagenet;
pub mod preprocess;

pub use imagenet::{batch_count, plan_batches, val_file_name, BatchPlan, ValImages};
pub use preprocess::{preprocess, IMAGENET_MEAN, IMAGENET_STD};
