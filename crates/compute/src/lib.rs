#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::sync::Arc;
use thiserror::Error;

pub mod backend;
pub mod cpu_backend;
pub mod device;
pub mod kernels;
pub mod layout;

pub use backend::ComputeBackend;
pub use cpu_backend::CpuBackend;
pub use device::{default_backend, Device};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComputeError {
    #[error("buffer shape mismatch: {0}")]
    ShapeMismatch(&'static str),
    #[error("backend not available")]
    BackendUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kernel {
    // Element-wise
    Tanh,
    Relu,

    // Broadcasting
    AddBroadcast,

    // Linear algebra
    MatMul,
}

impl Kernel {
    #[must_use]
    pub const fn binding_count(&self) -> u32 {
        layout::binding_count(self)
    }
}

/// Row-major matrix product configuration uploaded as the last `MatMul` binding.
///
/// With `transpose_b != 0` the second operand is read as `[n, k]` instead of
/// `[k, n]`, which lets dense layers keep their weights in `[out, in]` order.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MatMulConfig {
    pub m: u32,
    pub k: u32,
    pub n: u32,
    pub transpose_b: u32,
}

#[derive(Clone, Debug)]
pub struct BufferView {
    pub data: Arc<[u8]>,
    pub shape: Vec<usize>, // Number of elements per dimension
    pub element_size_in_bytes: usize,
}

impl BufferView {
    #[must_use]
    pub fn new(data: Arc<[u8]>, shape: Vec<usize>, element_size_in_bytes: usize) -> Self {
        Self { data, shape, element_size_in_bytes }
    }

    /// Wraps a slice of `f32` values in a view with the given shape.
    #[must_use]
    pub fn from_f32(values: &[f32], shape: Vec<usize>) -> Self {
        let bytes: Arc<[u8]> = bytemuck::cast_slice(values).to_vec().into();
        Self::new(bytes, shape, std::mem::size_of::<f32>())
    }

    /// Zero-filled `f32` buffer, used as the output placeholder of a dispatch.
    #[must_use]
    pub fn zeros_f32(shape: Vec<usize>) -> Self {
        let len = shape.iter().product::<usize>();
        let bytes: Arc<[u8]> = vec![0u8; len * std::mem::size_of::<f32>()].into();
        Self::new(bytes, shape, std::mem::size_of::<f32>())
    }

    /// Single-element config buffer holding a plain-old-data struct.
    #[must_use]
    pub fn from_pod<T: bytemuck::Pod>(value: &T) -> Self {
        let bytes: Arc<[u8]> = bytemuck::bytes_of(value).to_vec().into();
        Self::new(bytes, vec![1], std::mem::size_of::<T>())
    }

    #[must_use]
    pub fn element_count(&self) -> usize {
        self.shape.iter().product()
    }

    /// Checks that the byte length agrees with `shape` and `element_size_in_bytes`.
    ///
    /// # Errors
    /// Returns [`ComputeError::ShapeMismatch`] when the lengths disagree.
    pub fn validate(&self) -> Result<(), ComputeError> {
        if self.data.len() == self.element_count() * self.element_size_in_bytes {
            Ok(())
        } else {
            Err(ComputeError::ShapeMismatch(
                "Buffer data length does not match product of shape dimensions and element size",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_shape_fails() {
        let cpu = CpuBackend::new();
        let bad_buf = BufferView::new(vec![0u8; 12].into(), vec![4], 4);
        let out_buf = BufferView::new(vec![0u8; 16].into(), vec![4], 4);
        let cfg = BufferView::new(vec![0u8; 4].into(), vec![1], 4);
        let result = cpu.dispatch(&Kernel::Relu, &[bad_buf, out_buf, cfg], [1, 1, 1]);
        assert!(
            matches!(result, Err(ComputeError::ShapeMismatch(_))),
            "Expected ShapeMismatch error, got {result:?}"
        );
    }

    #[test]
    fn correct_shape_succeeds() {
        let cpu = CpuBackend::new();
        let good_buf = BufferView::new(vec![0u8; 16].into(), vec![4], 4);
        let out_buf = BufferView::new(vec![0u8; 16].into(), vec![4], 4);
        let cfg = BufferView::new(vec![0u8; 4].into(), vec![1], 4);
        let result = cpu.dispatch(&Kernel::Tanh, &[good_buf, out_buf, cfg], [1, 1, 1]);
        assert!(result.is_ok(), "Expected Ok, got {result:?}");
    }

    #[test]
    fn empty_binds_fail() {
        let cpu = CpuBackend::new();
        let result = cpu.dispatch(&Kernel::AddBroadcast, &[], [1, 1, 1]);
        assert!(matches!(result, Err(ComputeError::ShapeMismatch(_))));
    }

    #[test]
    fn shape_product_is_zero() {
        let cpu = CpuBackend::new();
        let empty = BufferView::new(vec![0u8; 0].into(), vec![0, 4], 4);
        let out_zero = BufferView::new(vec![0u8; 0].into(), vec![0, 4], 4);
        let cfg = BufferView::new(vec![0u8; 4].into(), vec![1], 4);
        let result = cpu.dispatch(&Kernel::Relu, &[empty, out_zero.clone(), cfg.clone()], [1, 1, 1]);
        assert!(result.is_ok(), "Expected Ok for zero-product shape with zero data, got {result:?}");

        let stray = BufferView::new(vec![0u8; 1].into(), vec![0, 4], 1);
        let result = cpu.dispatch(&Kernel::Relu, &[stray, out_zero, cfg], [1, 1, 1]);
        assert!(
            matches!(result, Err(ComputeError::ShapeMismatch(_))),
            "Expected ShapeMismatch for zero-product shape with non-zero data, got {result:?}"
        );
    }

    #[test]
    fn kernel_binding_counts() {
        assert_eq!(Kernel::Tanh.binding_count(), 3);
        assert_eq!(Kernel::Relu.binding_count(), 3);
        assert_eq!(Kernel::AddBroadcast.binding_count(), 3);
        assert_eq!(Kernel::MatMul.binding_count(), 4);
    }

    #[test]
    fn buffer_helpers_agree_on_layout() {
        let view = BufferView::from_f32(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
        assert_eq!(view.element_count(), 6);
        assert!(view.validate().is_ok());
        let zeros = BufferView::zeros_f32(vec![3, 2]);
        assert_eq!(zeros.data.len(), 24);
        let cfg = BufferView::from_pod(&MatMulConfig { m: 1, k: 2, n: 3, transpose_b: 0 });
        assert_eq!(cfg.data.len(), std::mem::size_of::<MatMulConfig>());
        assert!(cfg.validate().is_ok());
    }
}
