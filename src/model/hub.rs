//! Pretrained weight acquisition.
//!
//! Weight records are fetched over HTTP from `{base_url}/{model}.mpk` into a
//! local cache directory. A record already present in the cache is loaded
//! without touching the network. Transient fetch failures are retried
//! through the configured policy before giving up.

use std::fs;
use std::path::{Path, PathBuf};

use burn::module::Module;
use burn::record::CompactRecorder;
use burn::tensor::backend::Backend;
use tracing::info;

use super::classifier::{ImageClassifier, ImageClassifierConfig};
use crate::config::HubConfig;
use crate::retry::RetryPolicy;
use crate::utils::error::{Error, Result};

/// Hub handle: resolves model names to locally cached weight records.
#[derive(Debug, Clone)]
pub struct ModelHub {
    base_url: String,
    cache_dir: PathBuf,
    policy: RetryPolicy,
}

impl ModelHub {
    pub fn new(config: &HubConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cache_dir: config.cache_dir.clone(),
            policy: config.retry_policy(),
        }
    }

    /// Local cache path of a model's weight record
    pub fn weight_path(&self, model_name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.mpk", model_name))
    }

    /// Download URL of a model's weight record
    pub fn weight_url(&self, model_name: &str) -> String {
        format!("{}/{}.mpk", self.base_url, model_name)
    }

    /// Ensure the weight record is present locally, downloading it when
    /// absent. Returns the cache path.
    pub fn fetch_weights(&self, model_name: &str) -> Result<PathBuf> {
        let path = self.weight_path(model_name);

        if path.exists() {
            info!("Weight record for {} already cached, skipping download", model_name);
            return Ok(path);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let url = self.weight_url(model_name);
        info!("Downloading {} from {}", model_name, url);

        self.policy.run(
            "weight download",
            || download_file(&url, &path),
            |e| matches!(e, Error::ModelFetch(_)),
        )?;

        Ok(path)
    }

    /// Acquire the named pretrained classifier: fetch its weight record and
    /// load it into a model built from `config`.
    pub fn load_classifier<B: Backend>(
        &self,
        model_name: &str,
        config: &ImageClassifierConfig,
        device: &B::Device,
    ) -> Result<ImageClassifier<B>> {
        let path = self.fetch_weights(model_name)?;
        let recorder = CompactRecorder::new();

        ImageClassifier::new(config, device)
            .load_file(path, &recorder, device)
            .map_err(|e| Error::Model(format!("Failed to load {}: {:?}", model_name, e)))
    }
}

/// Download a single file to `dest`.
///
/// Connection failures and retryable statuses (5xx, 429) map to
/// `Error::ModelFetch`; any other unsuccessful status means the hub does not
/// serve this record and is not retried.
fn download_file(url: &str, dest: &Path) -> Result<()> {
    let response = reqwest::blocking::get(url)
        .map_err(|e| Error::ModelFetch(format!("{}: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        if status.is_server_error() || status.as_u16() == 429 {
            return Err(Error::ModelFetch(format!("{}: HTTP {}", url, status)));
        }
        return Err(Error::ModelNotFound(format!("{}: HTTP {}", url, status)));
    }

    let bytes = response
        .bytes()
        .map_err(|e| Error::ModelFetch(format!("{}: {}", url, e)))?;

    fs::write(dest, &bytes)?;
    Ok(())
}
