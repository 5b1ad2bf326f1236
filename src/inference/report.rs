//! Result documents written by the benchmark runs.
//!
//! Field names and nesting follow the comparison tooling's expected layout,
//! so the JSON can be diffed directly against records produced by other
//! frameworks.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::utils::error::Result;

/// Timing block of a batched classification run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyTimes {
    pub model_loading_s: f64,

    pub sum_loading_s: f64,
    pub sum_inference_s: f64,
    pub per_inference_s: f64,
    pub fps: f64,

    pub list_batch_loading_s: Vec<f64>,
    pub list_batch_inference_s: Vec<f64>,
}

impl ClassifyTimes {
    /// Aggregate per-batch timings.
    ///
    /// `num_images` must be positive; the runner rejects empty runs before
    /// any timing exists.
    pub fn new(
        model_loading_s: f64,
        list_batch_loading_s: Vec<f64>,
        list_batch_inference_s: Vec<f64>,
        num_images: usize,
    ) -> Self {
        let sum_loading_s: f64 = list_batch_loading_s.iter().sum();
        let sum_inference_s: f64 = list_batch_inference_s.iter().sum();

        Self {
            model_loading_s,
            sum_loading_s,
            sum_inference_s,
            per_inference_s: sum_inference_s / num_images as f64,
            fps: num_images as f64 / sum_inference_s,
            list_batch_loading_s,
            list_batch_inference_s,
        }
    }
}

/// Result record of one batched classification run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyReport {
    pub execution_device: String,
    pub model_name: String,
    pub framework: String,
    pub max_batch_size: usize,
    pub times: ClassifyTimes,
    /// file name -> top-1 class id
    pub predictions: BTreeMap<String, i64>,
    /// file name -> {class id -> probability}
    pub top_n: BTreeMap<String, BTreeMap<i64, f64>>,
}

/// Timing block of a single-pass scoring run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreTimes {
    pub model_loading_s: f64,
    pub data_loading_s: f64,
    pub all_inference_s: f64,
    pub per_inference_s: f64,
    pub fps: f64,
}

/// Result record of one single-pass scoring run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    pub execution_device: String,
    pub time: ScoreTimes,
    /// file name -> top-1 class id
    pub predictions: BTreeMap<String, i64>,
}

/// Write a report as pretty-printed JSON with a trailing newline.
pub fn save_json<T: Serialize>(report: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, json + "\n")?;
    Ok(())
}
