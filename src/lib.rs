//! # imagenet-bench
//!
//! Inference benchmarking for pretrained image classifiers, plus a
//! dependency-graph renderer for workflow entries, built on the Burn
//! framework.
//!
//! ## Modules
//!
//! - `backend`: compile-time Burn backend selection
//! - `device`: execution-device resolution from CLI hints
//! - `model`: classifier architecture and pretrained weight acquisition
//! - `dataset`: validation-image naming, batching, and preprocessing
//! - `inference`: the batched benchmark, the single-pass scorer, and their
//!   JSON result documents
//! - `graph`: entry resolution, ancestry traversal, DOT/SVG rendering
//! - `utils`: logging and error types
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use imagenet_bench::backend::{default_device, DefaultBackend};
//! use imagenet_bench::inference::{run_classify, ClassifyParams};
//! use imagenet_bench::model::{ImageClassifierConfig, ModelHub};
//!
//! let hub = ModelHub::new(&Default::default());
//! let device = default_device();
//! let report = run_classify::<DefaultBackend>(
//!     &params, &hub, &ImageClassifierConfig::new(), &device,
//! )?;
//! ```

pub mod backend;
pub mod config;
pub mod dataset;
pub mod device;
pub mod graph;
pub mod inference;
pub mod model;
pub mod retry;
pub mod utils;

pub use config::HubConfig;
pub use device::{resolve_execution_device, ExecutionDevice};
pub use graph::{draw, DirCatalog};
pub use inference::{run_classify, run_score, ClassifyParams, ClassifyReport, ScoreParams, ScoreReport};
pub use model::{ImageClassifier, ImageClassifierConfig, ModelHub};
pub use retry::RetryPolicy;
pub use utils::error::{Error, Result};

/// ImageNet class count
pub const NUM_CLASSES: usize = 1000;

/// Short side the input is resized to before cropping
pub const RESIZE_SIZE: u32 = 256;

/// Side length of the center crop fed to the model
pub const CROP_SIZE: u32 = 224;

/// Default number of retained predictions per image
pub const DEFAULT_TOP_N: usize = 10;

/// Framework tag recorded in result documents
pub const FRAMEWORK: &str = "burn";

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
