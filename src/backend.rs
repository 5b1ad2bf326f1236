//! Burn backend selection.
//!
//! The inference backend is fixed at compile time: NdArray (CPU) by default,
//! CUDA when the `cuda` feature is enabled. The runtime device *label* the
//! CLI resolves (see `device`) is recorded in result documents independently
//! of which backend this build carries.

use burn::tensor::backend::Backend;

#[cfg(feature = "cuda")]
pub type DefaultBackend = burn::backend::Cuda;

#[cfg(not(feature = "cuda"))]
pub type DefaultBackend = burn::backend::NdArray;

/// Get the default device for the compiled backend
pub fn default_device() -> <DefaultBackend as Backend>::Device {
    <DefaultBackend as Backend>::Device::default()
}

/// Get a human-readable name for the compiled backend
pub fn backend_name() -> &'static str {
    #[cfg(feature = "cuda")]
    {
        "CUDA (GPU)"
    }

    #[cfg(not(feature = "cuda"))]
    {
        "NdArray (CPU)"
    }
}
