//! Configuration for the pretrained-weight hub.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::retry::RetryPolicy;
use crate::utils::error::{Error, Result};

/// Default hub serving weight records per model name
pub const DEFAULT_HUB_URL: &str = "https://models.tracel.ai/imagenet";

/// Hub settings: where weight records come from and how fetches are retried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    /// Base URL the weight records are served from
    pub base_url: String,
    /// Local directory downloaded records are cached in
    pub cache_dir: PathBuf,
    /// Total fetch attempts per record
    pub max_attempts: usize,
    /// Delay between fetch attempts, in seconds
    pub retry_delay_s: u64,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_HUB_URL.to_string(),
            cache_dir: PathBuf::from("cache/models"),
            max_attempts: 3,
            retry_delay_s: 20,
        }
    }
}

impl HubConfig {
    /// Retry policy derived from the configured attempt count and delay
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::fixed(self.max_attempts, Duration::from_secs(self.retry_delay_s))
    }
}

/// Parse a TOML config file into any deserializable config struct.
pub fn load_toml_config<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config {}: {e}", path.display())))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse config {}: {e}", path.display())))
}
