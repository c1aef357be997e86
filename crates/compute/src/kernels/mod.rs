// This module re-exports handlers for each kernel operation.

use crate::{BufferView, ComputeError};
use std::borrow::Cow;

// Element-wise operations
pub mod unary_op;
pub mod tanh_op;
pub use tanh_op::handle_tanh;
pub mod relu_op;
pub use relu_op::handle_relu;

// Broadcasting
pub mod add_broadcast_op;
pub use add_broadcast_op::handle_add_broadcast;

// Linear algebra
pub mod matmul_op;
pub use matmul_op::handle_matmul;

/// Reads an `f32` buffer, borrowing when the bytes are suitably aligned.
pub(crate) fn f32_values<'a>(
    view: &'a BufferView,
    what: &'static str,
) -> Result<Cow<'a, [f32]>, ComputeError> {
    if view.element_size_in_bytes != std::mem::size_of::<f32>() {
        return Err(ComputeError::ShapeMismatch(what));
    }
    match bytemuck::try_cast_slice::<u8, f32>(&view.data) {
        Ok(values) => Ok(Cow::Borrowed(values)),
        Err(_) => Ok(Cow::Owned(
            view.data
                .chunks_exact(std::mem::size_of::<f32>())
                .map(bytemuck::pod_read_unaligned::<f32>)
                .collect(),
        )),
    }
}
