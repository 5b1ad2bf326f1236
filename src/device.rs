//! Execution-device resolution.
//!
//! The CLI accepts a device hint: `gpu` asks for GPU acceleration but falls
//! back to CPU when none is available, an empty hint auto-detects the same
//! way, and anything else is used verbatim. The resolved label is what gets
//! recorded in result documents; the tensor backend itself is fixed at
//! compile time (see `backend`).

use std::fmt;

use tracing::info;

/// Resolved execution device label
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionDevice {
    Cpu,
    Cuda,
    /// A hint taken verbatim (e.g. a vendor-specific device string)
    Other(String),
}

impl ExecutionDevice {
    /// Parse a literal device string without probing
    fn verbatim(hint: &str) -> Self {
        match hint {
            "cpu" => ExecutionDevice::Cpu,
            "cuda" => ExecutionDevice::Cuda,
            other => ExecutionDevice::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ExecutionDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionDevice::Cpu => write!(f, "cpu"),
            ExecutionDevice::Cuda => write!(f, "cuda"),
            ExecutionDevice::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Resolve the execution device from a CLI hint.
///
/// `gpu` probes for GPU availability and falls back to CPU; an empty hint
/// auto-detects the same way; any other hint is used verbatim.
pub fn resolve_execution_device(hint: &str) -> ExecutionDevice {
    match hint {
        "gpu" | "" => {
            if is_gpu_available() {
                info!("GPU detected, selecting cuda");
                ExecutionDevice::Cuda
            } else {
                if hint == "gpu" {
                    info!("GPU requested but not available, falling back to cpu");
                }
                ExecutionDevice::Cpu
            }
        }
        other => ExecutionDevice::verbatim(other),
    }
}

/// Check if GPU acceleration is available on this machine
pub fn is_gpu_available() -> bool {
    has_nvidia_gpu()
}

/// Check for an NVIDIA GPU (CUDA)
fn has_nvidia_gpu() -> bool {
    #[cfg(target_os = "linux")]
    {
        std::path::Path::new("/proc/driver/nvidia/version").exists()
            || std::path::Path::new("/dev/nvidia0").exists()
            || std::process::Command::new("nvidia-smi")
                .output()
                .map(|o| o.status.success())
                .unwrap_or(false)
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("nvidia-smi.exe")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        false
    }
}
