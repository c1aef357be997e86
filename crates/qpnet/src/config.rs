use crate::{NetError, ValueBounds};
use compute::{ComputeBackend, Device};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Width of the first hidden layer of both networks.
pub const HIDDEN_1: usize = 100;
/// Width of the second hidden layer of both networks.
pub const HIDDEN_2: usize = 50;

/// Construction-time settings shared by both networks.
///
/// Every field has a default, so `{}` is a valid config document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetConfig {
    pub device: Device,
    pub bounds: ValueBounds,
    /// Run on the CPU instead of failing when `device` is unavailable.
    pub fallback_to_cpu: bool,
}

impl NetConfig {
    #[must_use]
    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    #[must_use]
    pub fn with_cpu_fallback(mut self, fallback: bool) -> Self {
        self.fallback_to_cpu = fallback;
        self
    }

    /// Resolves the configured device.
    ///
    /// # Errors
    /// Returns [`NetError::Compute`] when the device is unavailable and
    /// fallback is off.
    pub fn backend(&self) -> Result<Arc<dyn ComputeBackend>, NetError> {
        if self.fallback_to_cpu {
            Ok(compute::default_backend(self.device))
        } else {
            Ok(self.device.backend()?)
        }
    }

    #[must_use]
    pub fn with_bounds(mut self, bounds: ValueBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// # Errors
    /// Fails on malformed JSON or invalid bounds.
    pub fn from_json_str(json: &str) -> Result<Self, NetError> {
        let config: Self = serde_json::from_str(json)?;
        config.bounds.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Fails if the file cannot be read or does not hold a valid config.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, NetError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
