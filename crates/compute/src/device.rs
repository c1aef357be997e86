//! Compute-target selection.
//!
//! The device is an ordinary configuration value handed to whoever builds
//! tensors, rather than process-wide state.

use crate::{ComputeBackend, ComputeError, CpuBackend};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    #[default]
    Cpu,
    /// A GPU or other accelerator. No such backend is compiled into this
    /// workspace, so resolving it always fails.
    Accelerator,
}

impl Device {
    /// Resolves the device into a backend instance.
    ///
    /// # Errors
    /// Returns [`ComputeError::BackendUnavailable`] for devices without a
    /// compiled-in backend.
    pub fn backend(self) -> Result<Arc<dyn ComputeBackend>, ComputeError> {
        match self {
            Device::Cpu => Ok(Arc::new(CpuBackend::new())),
            Device::Accelerator => Err(ComputeError::BackendUnavailable),
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => f.write_str("cpu"),
            Device::Accelerator => f.write_str("accelerator"),
        }
    }
}

/// Returns a backend for `preferred`, falling back to the CPU implementation
/// when the preferred device cannot be initialised.
#[must_use]
pub fn default_backend(preferred: Device) -> Arc<dyn ComputeBackend> {
    match preferred.backend() {
        Ok(backend) => {
            tracing::info!(device = %preferred, backend = backend.name(), "using compute backend");
            backend
        }
        Err(err) => {
            tracing::warn!(device = %preferred, %err, "backend initialization failed, falling back to cpu");
            Arc::new(CpuBackend::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_resolves() {
        let backend = Device::Cpu.backend().expect("cpu backend");
        assert_eq!(backend.name(), "cpu");
    }

    #[test]
    fn accelerator_is_unavailable() {
        assert!(matches!(
            Device::Accelerator.backend(),
            Err(ComputeError::BackendUnavailable)
        ));
    }

    #[test]
    fn fallback_lands_on_cpu() {
        assert_eq!(default_backend(Device::Accelerator).name(), "cpu");
        assert_eq!(default_backend(Device::Cpu).name(), "cpu");
    }

    #[test]
    fn default_is_cpu() {
        assert_eq!(Device::default(), Device::Cpu);
        assert_eq!(Device::Accelerator.to_string(), "accelerator");
    }
}
