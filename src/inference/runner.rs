//! Inference drivers: the batched classification benchmark and the
//! single-pass scorer.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use burn::tensor::activation::softmax;
use burn::tensor::{backend::Backend, Tensor};
use colored::Colorize;
use tracing::info;

use super::report::{save_json, ClassifyReport, ClassifyTimes, ScoreReport, ScoreTimes};
use crate::dataset::{plan_batches, ValImages};
use crate::device::resolve_execution_device;
use crate::model::{ImageClassifierConfig, ModelHub};
use crate::utils::error::{Error, Result};
use crate::{CROP_SIZE, FRAMEWORK};

/// Parameters of a batched classification run
#[derive(Debug, Clone)]
pub struct ClassifyParams {
    pub images_dir: PathBuf,
    pub num_images: usize,
    pub model_name: String,
    /// Skip persistence when unset
    pub output_path: Option<PathBuf>,
    /// `cpu`, `gpu`, or empty for auto-detection
    pub device_hint: String,
    pub max_batch_size: usize,
    pub top_n: usize,
}

/// Parameters of a single-pass scoring run
#[derive(Debug, Clone)]
pub struct ScoreParams {
    pub images_dir: PathBuf,
    pub num_images: usize,
    pub model_name: String,
    pub output_path: Option<PathBuf>,
    pub device_hint: String,
}

/// Highest-probability classes of one probability row, descending.
pub fn top_n_of(probs: &[f64], n: usize) -> Vec<(usize, f64)> {
    let mut indexed: Vec<(usize, f64)> = probs.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    indexed.truncate(n);
    indexed
}

fn stack_batch<B: Backend>(pre_batch: &[Vec<f32>], device: &B::Device) -> Tensor<B, 4> {
    let per_image = 3 * CROP_SIZE as usize * CROP_SIZE as usize;
    let mut flat = Vec::with_capacity(pre_batch.len() * per_image);
    for tensor in pre_batch {
        flat.extend_from_slice(tensor);
    }

    Tensor::<B, 1>::from_floats(flat.as_slice(), device).reshape([
        pre_batch.len(),
        3,
        CROP_SIZE as usize,
        CROP_SIZE as usize,
    ])
}

fn class_ids_of<B: Backend>(logits: &Tensor<B, 2>) -> Vec<i64> {
    logits.clone().argmax(1).into_data().iter::<i64>().collect()
}

/// Run the batched classification benchmark.
pub fn run_classify<B: Backend>(
    params: &ClassifyParams,
    hub: &ModelHub,
    model_config: &ImageClassifierConfig,
    device: &B::Device,
) -> Result<ClassifyReport> {
    if params.num_images == 0 {
        return Err(Error::InvalidArgument(
            "num_images must be at least 1".to_string(),
        ));
    }
    if params.max_batch_size == 0 {
        return Err(Error::InvalidArgument(
            "max_batch_size must be at least 1".to_string(),
        ));
    }

    let execution_device = resolve_execution_device(&params.device_hint);

    println!("{}", "Initializing classification benchmark...".green().bold());
    println!("  Model: {}", params.model_name);
    println!("  Images: {}", params.num_images);
    println!("  Batch size: {}", params.max_batch_size);
    println!("  Execution device: {}", execution_device);
    println!();

    let ts_before_model_loading = Instant::now();
    let model = hub.load_classifier::<B>(&params.model_name, model_config, device)?;
    let model_loading_s = ts_before_model_loading.elapsed().as_secs_f64();

    if params.top_n > model.num_classes() {
        return Err(Error::InvalidArgument(format!(
            "top_n {} exceeds the class count {}",
            params.top_n,
            model.num_classes()
        )));
    }

    let images = ValImages::new(&params.images_dir);
    let plans = plan_batches(params.num_images, params.max_batch_size);
    let batch_total = plans.len();
    let num_classes = model.num_classes();

    let mut predictions: BTreeMap<String, i64> = BTreeMap::new();
    let mut top_n_predictions: BTreeMap<String, BTreeMap<i64, f64>> = BTreeMap::new();
    let mut list_batch_loading_s = Vec::with_capacity(batch_total);
    let mut list_batch_inference_s = Vec::with_capacity(batch_total);

    for (batch_num, plan) in plans.iter().enumerate() {
        let ts_before_data_loading = Instant::now();

        let (batch_file_names, pre_batch) = images.load_batch(*plan)?;
        let input_batch = stack_batch::<B>(&pre_batch, device);

        let ts_before_inference = Instant::now();

        let output = model.forward(input_batch);
        let class_ids = class_ids_of(&output);

        let batch_loading_s = (ts_before_inference - ts_before_data_loading).as_secs_f64();
        let batch_inference_s = ts_before_inference.elapsed().as_secs_f64();
        list_batch_loading_s.push(batch_loading_s);
        list_batch_inference_s.push(batch_inference_s);

        // Probabilities are derived outside the timed window.
        let probs: Vec<f64> = softmax(output, 1).into_data().iter::<f64>().collect();

        println!(
            "batch {}/{}: ({}..{}) {:?}",
            batch_num + 1,
            batch_total,
            plan.start + 1,
            plan.end,
            class_ids
        );

        for (i, file_name) in batch_file_names.iter().enumerate() {
            let row = &probs[i * num_classes..(i + 1) * num_classes];
            let top: BTreeMap<i64, f64> = top_n_of(row, params.top_n)
                .into_iter()
                .map(|(class_id, prob)| (class_id as i64, prob))
                .collect();

            predictions.insert(file_name.clone(), class_ids[i]);
            top_n_predictions.insert(file_name.clone(), top);
        }
    }

    let report = ClassifyReport {
        execution_device: execution_device.to_string(),
        model_name: params.model_name.clone(),
        framework: FRAMEWORK.to_string(),
        max_batch_size: params.max_batch_size,
        times: ClassifyTimes::new(
            model_loading_s,
            list_batch_loading_s,
            list_batch_inference_s,
            params.num_images,
        ),
        predictions,
        top_n: top_n_predictions,
    };

    if let Some(output_path) = &params.output_path {
        save_json(&report, output_path)?;
        println!(
            "Predictions for {} images written into \"{}\"",
            params.num_images,
            output_path.display()
        );
        info!("Report saved to {}", output_path.display());
    }

    Ok(report)
}

/// Run the single-pass scorer: every image through one forward pass.
pub fn run_score<B: Backend>(
    params: &ScoreParams,
    hub: &ModelHub,
    model_config: &ImageClassifierConfig,
    device: &B::Device,
) -> Result<ScoreReport> {
    if params.num_images == 0 {
        return Err(Error::InvalidArgument(
            "num_images must be at least 1".to_string(),
        ));
    }

    let execution_device = resolve_execution_device(&params.device_hint);

    println!("{}", "Initializing scoring run...".green().bold());
    println!("  Model: {}", params.model_name);
    println!("  Images: {}", params.num_images);
    println!("  Execution device: {}", execution_device);
    println!();

    let ts_before_model_loading = Instant::now();
    let model = hub.load_classifier::<B>(&params.model_name, model_config, device)?;
    let ts_before_data_loading = Instant::now();

    let images = ValImages::new(&params.images_dir);
    let plan = plan_batches(params.num_images, params.num_images)[0];
    let (file_names, pre_batch) = images.load_batch(plan)?;
    let input_batch = stack_batch::<B>(&pre_batch, device);

    let ts_before_inference = Instant::now();

    let output = model.forward(input_batch);
    let class_ids = class_ids_of(&output);

    let all_inference_s = ts_before_inference.elapsed().as_secs_f64();

    let report = ScoreReport {
        execution_device: execution_device.to_string(),
        time: ScoreTimes {
            model_loading_s: (ts_before_data_loading - ts_before_model_loading).as_secs_f64(),
            data_loading_s: (ts_before_inference - ts_before_data_loading).as_secs_f64(),
            all_inference_s,
            per_inference_s: all_inference_s / params.num_images as f64,
            fps: params.num_images as f64 / all_inference_s,
        },
        predictions: file_names.into_iter().zip(class_ids.iter().copied()).collect(),
    };

    if let Some(output_path) = &params.output_path {
        save_json(&report, output_path)?;
        println!(
            "Predictions for {} images written into \"{}\"",
            params.num_images,
            output_path.display()
        );
    } else {
        println!("{:?}", class_ids);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DefaultBackend;
    use crate::config::HubConfig;

    #[test]
    fn test_top_n_of_ordering() {
        let probs = vec![0.05, 0.6, 0.1, 0.25];
        let top = top_n_of(&probs, 3);

        assert_eq!(top.len(), 3);
        assert_eq!(top[0].0, 1);
        assert_eq!(top[1].0, 3);
        assert_eq!(top[2].0, 2);
        // Argmax agrees with the first retained entry.
        assert!((top[0].1 - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_top_n_of_truncates_to_available() {
        let probs = vec![0.7, 0.3];
        assert_eq!(top_n_of(&probs, 5).len(), 2);
    }

    #[test]
    fn test_stack_batch_shape() {
        let device = Default::default();
        let per_image = 3 * CROP_SIZE as usize * CROP_SIZE as usize;
        let pre_batch = vec![vec![0.0f32; per_image]; 2];

        let tensor = stack_batch::<DefaultBackend>(&pre_batch, &device);
        assert_eq!(
            tensor.dims(),
            [2, 3, CROP_SIZE as usize, CROP_SIZE as usize]
        );
    }

    #[test]
    fn test_run_classify_rejects_empty_run() {
        let hub = ModelHub::new(&HubConfig::default());
        let device = Default::default();

        let params = ClassifyParams {
            images_dir: PathBuf::from("/tmp"),
            num_images: 0,
            model_name: "resnet50".to_string(),
            output_path: None,
            device_hint: "cpu".to_string(),
            max_batch_size: 4,
            top_n: 10,
        };

        let result =
            run_classify::<DefaultBackend>(&params, &hub, &ImageClassifierConfig::new(), &device);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }
}
